use std::future::Future;

use crate::error::IngestResult;

/// A keyed document store.
///
/// All writes are idempotent upserts: writing the same key twice replaces the
/// stored document, so redelivered queue messages never create duplicates.
/// Implementations must be cheaply cloneable since every persister worker
/// holds its own handle.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Returns the name of this document store.
    fn name(&self) -> &'static str;

    /// Inserts or fully replaces the document stored under `key` in
    /// `collection`.
    fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: serde_json::Value,
    ) -> impl Future<Output = IngestResult<()>> + Send;
}
