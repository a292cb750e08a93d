use std::fmt;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::types::{AddedObject, DagNode, UploadFile, VersionInfo};
use crate::{AttemptError, IpfsConfig, IpfsError, Operation};

#[derive(Clone)]
pub struct IpfsClient {
    http: Client,
    config: IpfsConfig,
}

impl fmt::Debug for IpfsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpfsClient")
            .field("config", &self.config)
            .finish()
    }
}

impl IpfsClient {
    pub fn new(config: IpfsConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn with_http_client(http: Client, config: IpfsConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &IpfsConfig {
        &self.config
    }

    /// Succeeds once the node answers `version` with `200 OK`.
    pub async fn check_daemon_running(&self) -> Result<(), IpfsError> {
        let url = self.config.api_url(Operation::CheckDaemon);
        self.send(Operation::CheckDaemon, &url, || Ok(self.post(&url)))
            .await?;
        tracing::debug!(url = %url, "IPFS daemon is running");
        Ok(())
    }

    pub async fn version(&self) -> Result<VersionInfo, IpfsError> {
        let url = self.config.api_url(Operation::CheckDaemon);
        let response = self
            .send(Operation::CheckDaemon, &url, || Ok(self.post(&url)))
            .await?;
        response
            .json::<VersionInfo>()
            .await
            .map_err(|err| IpfsError::Malformed(err.to_string()))
    }

    pub async fn dag_get(&self, cid: &str) -> Result<DagNode, IpfsError> {
        let url = self.config.api_url(Operation::DagGet);
        let response = self
            .send(Operation::DagGet, cid, || {
                Ok(self.post(&url).query(&[("arg", cid)]))
            })
            .await?;
        response
            .json::<DagNode>()
            .await
            .map_err(|err| IpfsError::Malformed(format!("dag/get {cid}: {err}")))
    }

    pub async fn cat(&self, cid: &str) -> Result<Vec<u8>, IpfsError> {
        let url = self.config.api_url(Operation::Cat);
        let response = self
            .send(Operation::Cat, cid, || Ok(self.post(&url).query(&[("arg", cid)])))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| IpfsError::Transport(err.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Uploads `files` wrapped in a single pinned directory and returns the directory CID.
    pub async fn add_wrapped(&self, files: &[UploadFile]) -> Result<String, IpfsError> {
        let url = self.config.api_url(Operation::Add);
        let response = self
            .send(Operation::Add, &url, || {
                let form = upload_form(files)?;
                Ok(self
                    .post(&url)
                    .query(&[("wrap-with-directory", "true"), ("pin", "true")])
                    .multipart(form))
            })
            .await?;
        let body = response
            .text()
            .await
            .map_err(|err| IpfsError::Transport(err.to_string()))?;

        let mut last = None;
        for line in body.lines().filter(|line| !line.trim().is_empty()) {
            let object: AddedObject = serde_json::from_str(line)
                .map_err(|err| IpfsError::Malformed(format!("add response line '{line}': {err}")))?;
            tracing::debug!(name = %object.name, hash = %object.hash, "added to ipfs");
            last = Some(object);
        }
        last.map(|object| object.hash)
            .ok_or_else(|| IpfsError::Malformed("empty add response".to_string()))
    }

    fn post(&self, url: &str) -> RequestBuilder {
        let request = self.http.post(url);
        match self.config.endpoint().credentials() {
            Some(credentials) => {
                request.basic_auth(credentials.api_key(), Some(credentials.api_secret()))
            }
            None => request,
        }
    }

    async fn send<F>(
        &self,
        operation: Operation,
        target: &str,
        make_request: F,
    ) -> Result<Response, IpfsError>
    where
        F: Fn() -> Result<RequestBuilder, AttemptError>,
    {
        self.config
            .retry_policy()
            .run(operation, target, || {
                attempt(make_request(), operation, target.to_string())
            })
            .await
    }
}

async fn attempt(
    request: Result<RequestBuilder, AttemptError>,
    operation: Operation,
    target: String,
) -> Result<Response, AttemptError> {
    let response = request?.send().await?;
    let status = response.status();
    let accepted = match operation {
        Operation::CheckDaemon => status == StatusCode::OK,
        _ => status.is_success(),
    };
    if accepted {
        return Ok(response);
    }

    let message = error_message(response).await;
    tracing::error!(
        %operation,
        target = %target,
        status = status.as_u16(),
        message = %message,
        "ipfs api call failed"
    );
    Err(AttemptError::Fatal(IpfsError::Api {
        operation,
        target,
        status: status.as_u16(),
        message,
    }))
}

async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| value.get("Message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn upload_form(files: &[UploadFile]) -> Result<Form, AttemptError> {
    let mut form = Form::new();
    for file in files {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str("application/octet-stream")?;
        form = form.part(file.field.clone(), part);
    }
    Ok(form)
}
