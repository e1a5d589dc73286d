use std::fmt;
use std::future::Future;

use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::error::{ErrorKind, IngestError, IngestResult};
use crate::ingest_error;
use crate::types::StreamKind;

/// Identifies one worker task within a pipeline for logs and error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerLabel {
    Poller { stream: StreamKind, slot: usize },
    Persister { stream: StreamKind, slot: usize },
}

impl fmt::Display for WorkerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerLabel::Poller { stream, slot } => write!(f, "{stream}-poller-{slot}"),
            WorkerLabel::Persister { stream, slot } => write!(f, "{stream}-persister-{slot}"),
        }
    }
}

/// Supervises the worker tasks of a pipeline.
///
/// Workers are spawned onto a [`JoinSet`] and awaited together; the failures
/// of individual workers are aggregated into a single error so one crashed
/// worker never hides another.
pub struct IngestWorkerPool {
    workers: JoinSet<(WorkerLabel, IngestResult<()>)>,
}

impl IngestWorkerPool {
    pub fn new() -> Self {
        Self {
            workers: JoinSet::new(),
        }
    }

    /// Returns the number of supervised workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Spawns a worker future under the given label.
    pub fn spawn<F>(&mut self, label: WorkerLabel, worker: F)
    where
        F: Future<Output = IngestResult<()>> + Send + 'static,
    {
        self.workers.spawn(async move { (label, worker.await) });
    }

    /// Waits for every worker to terminate.
    ///
    /// Returns `Ok` only if all workers terminated cleanly; otherwise all
    /// collected failures are returned together.
    pub async fn wait_all(mut self) -> IngestResult<()> {
        let mut errors = Vec::new();

        while let Some(result) = self.workers.join_next().await {
            match result {
                Ok((label, Ok(()))) => {
                    debug!(worker = %label, "worker terminated");
                }
                Ok((label, Err(err))) => {
                    error!(worker = %label, error = %err, "worker failed");
                    errors.push(err);
                }
                Err(err) if err.is_panic() => {
                    errors.push(ingest_error!(ErrorKind::WorkerPanic, "A worker panicked"));
                }
                Err(_) => {
                    errors.push(ingest_error!(
                        ErrorKind::WorkerCancelled,
                        "A worker was cancelled before terminating"
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(IngestError::from(errors))
        }
    }
}

impl Default for IngestWorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bail;

    fn label(slot: usize) -> WorkerLabel {
        WorkerLabel::Poller {
            stream: StreamKind::Facts,
            slot,
        }
    }

    #[tokio::test]
    async fn clean_workers_produce_no_error() {
        let mut pool = IngestWorkerPool::new();
        pool.spawn(label(0), async { Ok(()) });
        pool.spawn(label(1), async { Ok(()) });

        assert_eq!(pool.len(), 2);
        pool.wait_all().await.unwrap();
    }

    #[tokio::test]
    async fn failures_are_aggregated() {
        let mut pool = IngestWorkerPool::new();
        pool.spawn(label(0), async { Ok(()) });
        pool.spawn(label(1), async {
            bail!(ErrorKind::QueueFetchFailed, "First failure")
        });
        pool.spawn(label(2), async {
            bail!(ErrorKind::StoreWriteFailed, "Second failure")
        });

        let err = pool.wait_all().await.unwrap_err();
        let mut kinds = err.kinds();
        kinds.sort_by_key(|kind| format!("{kind:?}"));
        assert_eq!(
            kinds,
            vec![ErrorKind::QueueFetchFailed, ErrorKind::StoreWriteFailed]
        );
    }

    #[tokio::test]
    async fn panics_are_reported() {
        let mut pool = IngestWorkerPool::new();
        pool.spawn(label(0), async { panic!("boom") });

        let err = pool.wait_all().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WorkerPanic);
    }

    #[test]
    fn labels_render_stream_and_slot() {
        let label = WorkerLabel::Persister {
            stream: StreamKind::Definitions,
            slot: 3,
        };
        assert_eq!(label.to_string(), "definitions-persister-3");
    }
}
