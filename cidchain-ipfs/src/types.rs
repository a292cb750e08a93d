use serde::{Deserialize, Serialize};

/// A node returned by `dag/get`. Only the links matter here.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DagNode {
    #[serde(rename = "Links", default)]
    pub links: Vec<DagLink>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DagLink {
    #[serde(rename = "Hash", default)]
    pub hash: Option<CidRef>,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Tsize", default)]
    pub tsize: Option<u64>,
}

/// DAG-JSON link encoding: `{"/": "<cid>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CidRef {
    #[serde(rename = "/")]
    pub cid: String,
}

impl DagLink {
    pub fn cid(&self) -> Option<&str> {
        self.hash
            .as_ref()
            .map(|hash| hash.cid.as_str())
            .filter(|cid| !cid.is_empty())
    }

    /// Names carrying an extension are files; everything else is walked as a directory.
    pub fn is_file(&self) -> bool {
        self.name.contains('.')
    }
}

/// One line of the newline-delimited `add` response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AddedObject {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Hash")]
    pub hash: String,
    #[serde(rename = "Size", default)]
    pub size: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "Commit", default)]
    pub commit: String,
    #[serde(rename = "Repo", default)]
    pub repo: String,
    #[serde(rename = "System", default)]
    pub system: String,
    #[serde(rename = "Golang", default)]
    pub golang: String,
}

/// A file reached while walking a directory DAG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub cid: String,
    pub name: String,
}

/// A multipart file part for `add`.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}
