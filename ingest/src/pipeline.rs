use tokio::sync::mpsc;
use tracing::{Instrument, info, info_span};

use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::error::IngestResult;
use crate::queue::base::QueueSource;
use crate::stats::StatsRegistry;
use crate::store::base::DocumentStore;
use crate::types::StreamKind;
use crate::workers::persister::PersisterWorker;
use crate::workers::pool::{IngestWorkerPool, WorkerLabel};
use crate::workers::poller::QueuePoller;

/// Static wiring of one ingestion stream.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Which message category this pipeline handles.
    pub stream: StreamKind,
    /// Queue to drain.
    pub queue_url: String,
    /// Store collection to persist into.
    pub collection: String,
    /// Number of poller and persister pairs to run.
    pub num_workers: usize,
}

/// One ingestion stream: `num_workers` poller and persister pairs draining a
/// single queue into a single collection.
///
/// Each pair is connected by its own rendezvous-sized channel, so a poller
/// only fetches ahead by the one message its persister is working on.
/// Workers of the same stream are interchangeable; adding pairs raises
/// throughput without changing per-message behavior.
pub struct StreamPipeline<Q, S> {
    config: StreamConfig,
    queue: Q,
    store: S,
    stats: StatsRegistry,
    pool: IngestWorkerPool,
    shutdown_tx: ShutdownTx,
}

impl<Q, S> StreamPipeline<Q, S>
where
    Q: QueueSource,
    S: DocumentStore,
{
    pub fn new(config: StreamConfig, queue: Q, store: S, stats: StatsRegistry) -> Self {
        let (shutdown_tx, _) = create_shutdown_channel();

        Self {
            config,
            queue,
            store,
            stats,
            pool: IngestWorkerPool::new(),
            shutdown_tx,
        }
    }

    /// Returns a handle that can request shutdown of this pipeline.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Spawns all worker pairs of this stream.
    pub fn start(&mut self) {
        let stream = self.config.stream;

        info!(
            stream = %stream,
            queue_url = self.config.queue_url,
            collection = self.config.collection,
            num_workers = self.config.num_workers,
            "starting stream pipeline"
        );

        for slot in 0..self.config.num_workers {
            let (tx, rx) = mpsc::channel(1);

            let poller = QueuePoller::new(
                self.queue.clone(),
                self.config.queue_url.clone(),
                stream,
                self.stats.clone(),
                tx,
                self.shutdown_tx.subscribe(),
            );
            let persister = PersisterWorker::new(
                self.store.clone(),
                self.config.collection.clone(),
                stream,
                self.stats.clone(),
                rx,
                self.shutdown_tx.subscribe(),
            );

            self.pool.spawn(
                WorkerLabel::Poller { stream, slot },
                poller
                    .run()
                    .instrument(info_span!("poller", stream = %stream, slot)),
            );
            self.pool.spawn(
                WorkerLabel::Persister { stream, slot },
                persister
                    .run()
                    .instrument(info_span!("persister", stream = %stream, slot)),
            );
        }
    }

    /// Requests shutdown of all workers without waiting for them.
    pub fn shutdown(&self) {
        // An error only means every worker already terminated.
        let _ = self.shutdown_tx.shutdown();
    }

    /// Waits until every worker has terminated.
    pub async fn wait(self) -> IngestResult<()> {
        self.pool.wait_all().await
    }

    /// Requests shutdown and waits for all workers to terminate.
    pub async fn shutdown_and_wait(self) -> IngestResult<()> {
        self.shutdown();
        self.wait().await
    }
}
