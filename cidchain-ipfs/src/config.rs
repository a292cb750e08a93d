use std::fmt;
use std::time::Duration;

use crate::{IpfsError, Operation, RetryPolicy};

pub const LOCAL_API_URL: &str = "http://127.0.0.1:5001";
pub const INFURA_API_URL: &str = "https://ipfs.infura.io:5001";
pub const API_PATH: &str = "api/v0";

const ENV_API_URL: &str = "IPFS_API_URL";
const ENV_USE_INFURA: &str = "IPFS_USE_INFURA";
const ENV_INFURA_API_KEY: &str = "INFURA_API_KEY";
const ENV_INFURA_API_SECRET: &str = "INFURA_API_SECRET";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Where API calls go. Local and hosted modes are mutually exclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Local {
        base_url: String,
    },
    Hosted {
        base_url: String,
        credentials: Credentials,
    },
}

impl Endpoint {
    pub fn base_url(&self) -> &str {
        match self {
            Endpoint::Local { base_url } | Endpoint::Hosted { base_url, .. } => base_url,
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Endpoint::Local { .. } => None,
            Endpoint::Hosted { credentials, .. } => Some(credentials),
        }
    }

    pub fn is_hosted(&self) -> bool {
        matches!(self, Endpoint::Hosted { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpfsConfig {
    endpoint: Endpoint,
    retry: RetryPolicy,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self::local()
    }
}

impl IpfsConfig {
    pub fn builder() -> IpfsConfigBuilder {
        IpfsConfigBuilder::new()
    }

    /// Local daemon at `http://127.0.0.1:5001` with the default retry policy.
    pub fn local() -> Self {
        Self {
            endpoint: Endpoint::Local {
                base_url: LOCAL_API_URL.to_string(),
            },
            retry: RetryPolicy::default(),
        }
    }

    pub fn infura(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, IpfsError> {
        IpfsConfigBuilder::new()
            .use_infura(true)
            .infura_api_key(api_key)
            .infura_api_secret(api_secret)
            .build()
    }

    pub fn from_env() -> Result<Self, IpfsError> {
        IpfsConfigBuilder::new().from_env().build()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Full URL of an API call, e.g. `http://127.0.0.1:5001/api/v0/dag/get`.
    pub fn api_url(&self, operation: Operation) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.base_url().trim_end_matches('/'),
            API_PATH,
            operation.suffix()
        )
    }
}

#[derive(Clone, Default)]
pub struct IpfsConfigBuilder {
    use_infura: bool,
    api_url: Option<String>,
    infura_api_key: Option<String>,
    infura_api_secret: Option<String>,
    retry: RetryPolicy,
}

impl fmt::Debug for IpfsConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| if value.is_some() { "<redacted>" } else { "<none>" };
        f.debug_struct("IpfsConfigBuilder")
            .field("use_infura", &self.use_infura)
            .field("api_url", &self.api_url)
            .field("infura_api_key", &redact(&self.infura_api_key))
            .field("infura_api_secret", &redact(&self.infura_api_secret))
            .field("retry", &self.retry)
            .finish()
    }
}

impl IpfsConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_infura(mut self, value: bool) -> Self {
        self.use_infura = value;
        self
    }

    /// Overrides the base URL of whichever mode is selected.
    pub fn api_url(mut self, value: impl Into<String>) -> Self {
        self.api_url = Some(value.into());
        self
    }

    pub fn infura_api_key(mut self, value: impl Into<String>) -> Self {
        self.infura_api_key = Some(value.into());
        self
    }

    pub fn infura_api_secret(mut self, value: impl Into<String>) -> Self {
        self.infura_api_secret = Some(value.into());
        self
    }

    pub fn max_retries(mut self, value: usize) -> Self {
        self.retry.max_retries = value;
        self
    }

    pub fn retry_delay(mut self, value: Duration) -> Self {
        self.retry.retry_delay = value;
        self
    }

    pub fn retry_policy(mut self, value: RetryPolicy) -> Self {
        self.retry = value;
        self
    }

    pub fn api_url_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.api_url = Some(value);
        }
        self
    }

    pub fn use_infura_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.use_infura = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        self
    }

    pub fn infura_api_key_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.infura_api_key = Some(value);
        }
        self
    }

    pub fn infura_api_secret_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.infura_api_secret = Some(value);
        }
        self
    }

    /// Applies `IPFS_API_URL`, `IPFS_USE_INFURA`, `INFURA_API_KEY` and `INFURA_API_SECRET`.
    pub fn from_env(self) -> Self {
        self.api_url_from_env(ENV_API_URL)
            .use_infura_from_env(ENV_USE_INFURA)
            .infura_api_key_from_env(ENV_INFURA_API_KEY)
            .infura_api_secret_from_env(ENV_INFURA_API_SECRET)
    }

    pub fn build(self) -> Result<IpfsConfig, IpfsError> {
        let default_url = if self.use_infura {
            INFURA_API_URL
        } else {
            LOCAL_API_URL
        };
        let base_url = self
            .api_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| default_url.to_string());
        reqwest::Url::parse(&base_url)
            .map_err(|err| IpfsError::Config(format!("invalid api url '{base_url}': {err}")))?;

        let endpoint = if self.use_infura {
            let api_key = non_blank(self.infura_api_key);
            let api_secret = non_blank(self.infura_api_secret);
            let (Some(api_key), Some(api_secret)) = (api_key, api_secret) else {
                return Err(IpfsError::Config(
                    "Infura API key and secret are required when using Infura".to_string(),
                ));
            };
            Endpoint::Hosted {
                base_url,
                credentials: Credentials::new(api_key, api_secret),
            }
        } else {
            Endpoint::Local { base_url }
        };

        Ok(IpfsConfig {
            endpoint,
            retry: self.retry,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
