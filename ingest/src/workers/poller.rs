use metrics::counter;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::concurrency::shutdown::ShutdownRx;
use crate::error::IngestResult;
use crate::metrics::{
    INGEST_MESSAGES_RECEIVED_TOTAL, INGEST_QUEUE_FETCH_FAILURES_TOTAL, STREAM_LABEL,
};
use crate::queue::base::{QueueMessage, QueueSource};
use crate::stats::StatsRegistry;
use crate::types::StreamKind;

/// Maximum number of messages requested per fetch.
const FETCH_BATCH_SIZE: usize = 10;

/// Drains one queue and hands each fetched message to its paired persister.
///
/// Fetched messages are removed from the queue before the hand-off, so a
/// crash between removal and persistence loses the message rather than
/// redelivering it. Fetch failures are counted and the next cycle starts
/// immediately, since a long-polling fetch already paces the loop.
pub struct QueuePoller<Q> {
    queue: Q,
    queue_url: String,
    stream: StreamKind,
    stats: StatsRegistry,
    tx: mpsc::Sender<QueueMessage>,
    shutdown_rx: ShutdownRx,
}

impl<Q> QueuePoller<Q>
where
    Q: QueueSource,
{
    pub fn new(
        queue: Q,
        queue_url: String,
        stream: StreamKind,
        stats: StatsRegistry,
        tx: mpsc::Sender<QueueMessage>,
        shutdown_rx: ShutdownRx,
    ) -> Self {
        Self {
            queue,
            queue_url,
            stream,
            stats,
            tx,
            shutdown_rx,
        }
    }

    /// Runs the polling loop until shutdown is requested or the paired
    /// persister terminates.
    pub async fn run(self) -> IngestResult<()> {
        let QueuePoller {
            queue,
            queue_url,
            stream,
            stats,
            tx,
            mut shutdown_rx,
        } = self;

        info!(stream = %stream, queue_url, "starting queue poller");

        loop {
            if shutdown_rx.is_shutdown() {
                info!(stream = %stream, "shutting down queue poller");
                return Ok(());
            }

            let messages = tokio::select! {
                biased;
                _ = shutdown_rx.wait_for_shutdown() => {
                    info!(stream = %stream, "shutting down queue poller");
                    return Ok(());
                }
                result = queue.fetch(&queue_url, FETCH_BATCH_SIZE) => match result {
                    Ok(messages) => messages,
                    Err(err) => {
                        warn!(stream = %stream, error = %err, "queue fetch failed");
                        counter!(INGEST_QUEUE_FETCH_FAILURES_TOTAL, STREAM_LABEL => stream.as_str())
                            .increment(1);
                        continue;
                    }
                },
            };

            for message in messages {
                // Removal is fire and forget. A failed removal only means the
                // queue redelivers the message later, and the idempotent
                // store absorbs the duplicate write.
                if let Err(err) = queue.remove(&queue_url, &message.receipt_handle).await {
                    debug!(stream = %stream, error = %err, "failed to remove fetched message");
                }

                stats.record_received(stream);
                counter!(INGEST_MESSAGES_RECEIVED_TOTAL, STREAM_LABEL => stream.as_str())
                    .increment(1);

                if tx.send(message).await.is_err() {
                    // The paired persister is gone, which only happens during
                    // shutdown.
                    return Ok(());
                }
            }
        }
    }
}
