use metrics::counter;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::concurrency::shutdown::ShutdownRx;
use crate::error::{ErrorKind, IngestResult};
use crate::metrics::{
    INGEST_MALFORMED_MESSAGES_TOTAL, INGEST_MESSAGES_STORED_TOTAL,
    INGEST_STORE_WRITE_FAILURES_TOTAL, STREAM_LABEL,
};
use crate::queue::base::QueueMessage;
use crate::stats::StatsRegistry;
use crate::store::base::DocumentStore;
use crate::transform::{flatten_fact_message, parse_definition_message};
use crate::types::StreamKind;

/// Transforms messages received from its paired poller and persists the
/// resulting documents.
///
/// Failures never stop the loop: a message that cannot be parsed or written
/// is logged, counted, and dropped, and the worker moves on to the next one.
/// The stored counter is bumped once per message only after every document
/// derived from it has been written.
pub struct PersisterWorker<S> {
    store: S,
    collection: String,
    stream: StreamKind,
    stats: StatsRegistry,
    rx: mpsc::Receiver<QueueMessage>,
    shutdown_rx: ShutdownRx,
}

impl<S> PersisterWorker<S>
where
    S: DocumentStore,
{
    pub fn new(
        store: S,
        collection: String,
        stream: StreamKind,
        stats: StatsRegistry,
        rx: mpsc::Receiver<QueueMessage>,
        shutdown_rx: ShutdownRx,
    ) -> Self {
        Self {
            store,
            collection,
            stream,
            stats,
            rx,
            shutdown_rx,
        }
    }

    /// Runs the persisting loop until shutdown is requested or the paired
    /// poller terminates.
    pub async fn run(self) -> IngestResult<()> {
        let PersisterWorker {
            store,
            collection,
            stream,
            stats,
            mut rx,
            mut shutdown_rx,
        } = self;

        info!(stream = %stream, collection, "starting persister");

        loop {
            let message = tokio::select! {
                biased;
                _ = shutdown_rx.wait_for_shutdown() => {
                    info!(stream = %stream, "shutting down persister");
                    return Ok(());
                }
                message = rx.recv() => match message {
                    Some(message) => message,
                    // The paired poller is gone, which only happens during
                    // shutdown.
                    None => return Ok(()),
                },
            };

            let stored = match stream {
                StreamKind::Definitions => {
                    persist_definitions(&store, &collection, stream, &message).await
                }
                StreamKind::Facts => persist_facts(&store, &collection, stream, &message).await,
            };

            if stored {
                stats.record_stored(stream);
                counter!(INGEST_MESSAGES_STORED_TOTAL, STREAM_LABEL => stream.as_str())
                    .increment(1);
            }
        }
    }
}

/// Persists every definition embedded in a pool definitions message.
///
/// Returns whether the message counts as stored.
async fn persist_definitions<S>(
    store: &S,
    collection: &str,
    stream: StreamKind,
    message: &QueueMessage,
) -> bool
where
    S: DocumentStore,
{
    let definitions = match parse_definition_message(&message.body) {
        Ok(definitions) => definitions,
        Err(err) if err.kind() == ErrorKind::MissingDefinition => {
            warn!(stream = %stream, "message contains no pool definitions, skipping");
            counter!(INGEST_MALFORMED_MESSAGES_TOTAL, STREAM_LABEL => stream.as_str())
                .increment(1);
            return false;
        }
        Err(err) => {
            warn!(stream = %stream, error = %err, "failed to parse message, skipping");
            counter!(INGEST_MALFORMED_MESSAGES_TOTAL, STREAM_LABEL => stream.as_str())
                .increment(1);
            return false;
        }
    };

    for definition in &definitions {
        let document = match serde_json::to_value(definition) {
            Ok(document) => document,
            Err(err) => {
                error!(stream = %stream, error = %err, "failed to serialize pool definition");
                return false;
            }
        };

        if let Err(err) = store.upsert(collection, &definition.id, document).await {
            error!(
                stream = %stream,
                error = %err,
                pool_id = definition.id,
                "failed to write pool definition, dropping message"
            );
            counter!(INGEST_STORE_WRITE_FAILURES_TOTAL, STREAM_LABEL => stream.as_str())
                .increment(1);
            return false;
        }
    }

    true
}

/// Flattens an inventory facts message and persists each resulting record.
///
/// Returns whether the message counts as stored.
async fn persist_facts<S>(
    store: &S,
    collection: &str,
    stream: StreamKind,
    message: &QueueMessage,
) -> bool
where
    S: DocumentStore,
{
    let records = match flatten_fact_message(&message.body) {
        Ok(records) => records,
        Err(err) => {
            warn!(stream = %stream, error = %err, "failed to parse message, skipping");
            counter!(INGEST_MALFORMED_MESSAGES_TOTAL, STREAM_LABEL => stream.as_str())
                .increment(1);
            return false;
        }
    };

    for record in &records {
        let key = record.key().storage_key();
        let document = match serde_json::to_value(record) {
            Ok(document) => document,
            Err(err) => {
                error!(stream = %stream, error = %err, "failed to serialize inventory fact");
                return false;
            }
        };

        if let Err(err) = store.upsert(collection, &key, document).await {
            error!(
                stream = %stream,
                error = %err,
                key,
                "failed to write inventory fact, dropping message"
            );
            counter!(INGEST_STORE_WRITE_FAILURES_TOTAL, STREAM_LABEL => stream.as_str())
                .increment(1);
            return false;
        }
    }

    true
}
