//! Concurrency utilities for coordinating pipeline workers.
//!
//! The [`shutdown`] module implements the broadcast-based shutdown pattern
//! used by every poller and persister loop: a single signal terminates all
//! workers of a pipeline at their next suspension point.

pub mod shutdown;
