//! Core ingestion pipeline: drains queue messages, normalizes them, and
//! persists the resulting documents idempotently while tracking throughput.

pub mod concurrency;
pub mod error;
pub mod macros;
pub mod metrics;
pub mod pipeline;
pub mod queue;
pub mod stats;
pub mod store;
pub mod transform;
pub mod types;
pub mod workers;
