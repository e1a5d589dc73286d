use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use uuid::Uuid;

use crate::bail;
use crate::error::{ErrorKind, IngestResult};
use crate::queue::base::{QueueMessage, QueueSource};

/// How long an empty fetch parks before returning no messages, emulating the
/// long-poll window of a real queue service at test-friendly speed.
const EMPTY_FETCH_WAIT: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<String>,
    inflight: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Inner {
    queues: HashMap<String, QueueState>,
    fail_next_fetches: u64,
    removed: u64,
}

/// An in-memory [`QueueSource`] used in tests.
///
/// Messages are pushed by the test and drained by pollers exactly as from a
/// real queue: fetched messages move to an in-flight set and disappear only
/// when removed. Fetch failures can be injected to exercise the retry path.
#[derive(Debug, Clone, Default)]
pub struct MemoryQueue {
    inner: Arc<Mutex<Inner>>,
    notify: Arc<Notify>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a message body on the queue at `queue_url`.
    pub async fn push(&self, queue_url: &str, body: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner
            .queues
            .entry(queue_url.to_string())
            .or_default()
            .pending
            .push_back(body.into());
        drop(inner);

        self.notify.notify_waiters();
    }

    /// Makes the next `count` fetches fail, independent of queue URL.
    pub async fn fail_next_fetches(&self, count: u64) {
        self.inner.lock().await.fail_next_fetches = count;
    }

    /// Returns how many messages have been removed so far.
    pub async fn removed_count(&self) -> u64 {
        self.inner.lock().await.removed
    }

    /// Returns the number of messages still pending on the queue at
    /// `queue_url`.
    pub async fn pending_len(&self, queue_url: &str) -> usize {
        let inner = self.inner.lock().await;
        inner
            .queues
            .get(queue_url)
            .map(|queue| queue.pending.len())
            .unwrap_or(0)
    }

    /// Returns the number of fetched but not yet removed messages on the
    /// queue at `queue_url`.
    pub async fn inflight_len(&self, queue_url: &str) -> usize {
        let inner = self.inner.lock().await;
        inner
            .queues
            .get(queue_url)
            .map(|queue| queue.inflight.len())
            .unwrap_or(0)
    }

    async fn try_fetch(
        &self,
        queue_url: &str,
        max_messages: usize,
    ) -> IngestResult<Vec<QueueMessage>> {
        let mut inner = self.inner.lock().await;

        if inner.fail_next_fetches > 0 {
            inner.fail_next_fetches -= 1;
            bail!(
                ErrorKind::QueueFetchFailed,
                "Injected fetch failure",
                format!("queue url '{queue_url}'")
            );
        }

        let queue = inner.queues.entry(queue_url.to_string()).or_default();
        let mut messages = Vec::new();
        while messages.len() < max_messages {
            let Some(body) = queue.pending.pop_front() else {
                break;
            };

            let receipt_handle = Uuid::new_v4().to_string();
            queue.inflight.insert(receipt_handle.clone(), body.clone());
            messages.push(QueueMessage {
                body,
                receipt_handle,
            });
        }

        Ok(messages)
    }
}

impl QueueSource for MemoryQueue {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, queue_url: &str, max_messages: usize) -> IngestResult<Vec<QueueMessage>> {
        let messages = self.try_fetch(queue_url, max_messages).await?;
        if !messages.is_empty() {
            return Ok(messages);
        }

        // Park until a push arrives or the polling window elapses, then try
        // once more so a concurrent push is not missed.
        let _ = tokio::time::timeout(EMPTY_FETCH_WAIT, self.notify.notified()).await;

        self.try_fetch(queue_url, max_messages).await
    }

    async fn remove(&self, queue_url: &str, receipt_handle: &str) -> IngestResult<()> {
        let mut inner = self.inner.lock().await;

        let Some(queue) = inner.queues.get_mut(queue_url) else {
            bail!(
                ErrorKind::QueueRemoveFailed,
                "Unknown queue",
                format!("queue url '{queue_url}'")
            );
        };

        if queue.inflight.remove(receipt_handle).is_none() {
            bail!(
                ErrorKind::QueueRemoveFailed,
                "Unknown receipt handle",
                format!("receipt handle '{receipt_handle}'")
            );
        }

        inner.removed += 1;

        Ok(())
    }
}
