//! Pipeline workers.
//!
//! Each stream runs pairs of workers: a [`poller::QueuePoller`] draining the
//! queue and a [`persister::PersisterWorker`] transforming and storing what
//! the poller hands over. Pairs are supervised by a [`pool::IngestWorkerPool`].

pub mod persister;
pub mod pool;
pub mod poller;
