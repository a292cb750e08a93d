use std::collections::HashMap;

use cidchain_core::{Document, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryDocstore {
    docs: HashMap<String, Document>,
}

impl InMemoryDocstore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds documents keyed by their id. Fails without inserting anything if any id is
    /// already present.
    pub fn add(&mut self, docs: Vec<Document>) -> Result<(), StoreError> {
        if let Some(doc) = docs.iter().find(|doc| self.docs.contains_key(&doc.id)) {
            return Err(StoreError::DuplicateId(doc.id.clone()));
        }
        for doc in docs {
            self.docs.insert(doc.id.clone(), doc);
        }
        Ok(())
    }

    pub fn search(&self, id: &str) -> Option<&Document> {
        self.docs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    pub fn delete(&mut self, ids: &[String]) -> usize {
        ids.iter()
            .filter(|id| self.docs.remove(id.as_str()).is_some())
            .count()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.docs.keys().map(String::as_str)
    }
}

/// Serialized form of the row mapping plus the docstore, persisted next to the index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocstoreSnapshot {
    pub index_to_docstore_id: Vec<String>,
    pub docstore: InMemoryDocstore,
}

impl DocstoreSnapshot {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, StoreError> {
        serde_json::from_slice(bytes).map_err(|err| StoreError::Internal(Box::new(err)))
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(self).map_err(|err| StoreError::Internal(Box::new(err)))
    }
}
