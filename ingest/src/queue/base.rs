use std::future::Future;

use crate::error::IngestResult;

/// A message fetched from a queue, still held in flight by the queue service
/// until removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// The raw message payload.
    pub body: String,
    /// Opaque token identifying this delivery for removal.
    pub receipt_handle: String,
}

/// A source of queue messages.
///
/// Implementations must be cheaply cloneable since every poller worker holds
/// its own handle. Fetching uses long polling where the backing service
/// supports it, so an empty queue parks the caller instead of spinning.
pub trait QueueSource: Clone + Send + Sync + 'static {
    /// Returns the name of this queue source.
    fn name(&self) -> &'static str;

    /// Fetches up to `max_messages` messages from the queue at `queue_url`.
    ///
    /// Returns an empty vector when no messages are available within the
    /// polling window.
    fn fetch(
        &self,
        queue_url: &str,
        max_messages: usize,
    ) -> impl Future<Output = IngestResult<Vec<QueueMessage>>> + Send;

    /// Removes a fetched message from the queue so it is not redelivered.
    fn remove(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> impl Future<Output = IngestResult<()>> + Send;
}
