use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::IngestResult;
use crate::store::base::DocumentStore;

/// An in-memory [`DocumentStore`] used in tests.
///
/// Documents are held per collection in key order so assertions over the
/// stored state are deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, BTreeMap<String, serde_json::Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the document stored under `key`, if any.
    pub async fn document(&self, collection: &str, key: &str) -> Option<serde_json::Value> {
        let collections = self.collections.lock().await;
        collections
            .get(collection)
            .and_then(|documents| documents.get(key))
            .cloned()
    }

    /// Returns all documents of a collection as `(key, document)` pairs in
    /// key order.
    pub async fn documents(&self, collection: &str) -> Vec<(String, serde_json::Value)> {
        let collections = self.collections.lock().await;
        collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(key, document)| (key.clone(), document.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the number of documents in a collection.
    pub async fn collection_len(&self, collection: &str) -> usize {
        let collections = self.collections.lock().await;
        collections
            .get(collection)
            .map(|documents| documents.len())
            .unwrap_or(0)
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: serde_json::Value,
    ) -> IngestResult<()> {
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document);

        Ok(())
    }
}
