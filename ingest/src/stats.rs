//! Process-wide throughput counters shared between pollers and persisters.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::StreamKind;

#[derive(Debug, Default)]
struct Inner {
    definitions_received: AtomicU64,
    facts_received: AtomicU64,
    definitions_stored: AtomicU64,
    facts_stored: AtomicU64,
}

/// Shared registry of the four throughput counters.
///
/// [`StatsRegistry`] is cheap to clone; all clones share the same counters.
/// Pollers increment the "received" counters, persisters the "stored" ones,
/// and the status surface reads point-in-time snapshots. Counters are
/// monotonic for the lifetime of the process and are reset only on restart.
///
/// No cross-counter atomicity is provided: "received" and "stored" for the
/// same message are never observable as a consistent pair.
#[derive(Debug, Clone, Default)]
pub struct StatsRegistry {
    inner: Arc<Inner>,
}

/// Point-in-time copy of all counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub definitions_received: u64,
    pub facts_received: u64,
    pub definitions_stored: u64,
    pub facts_stored: u64,
}

impl StatsRegistry {
    /// Creates a new registry with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the "received" counter for the given stream by one.
    pub fn record_received(&self, stream: StreamKind) {
        let counter = match stream {
            StreamKind::Definitions => &self.inner.definitions_received,
            StreamKind::Facts => &self.inner.facts_received,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the "stored" counter for the given stream by one.
    pub fn record_stored(&self, stream: StreamKind) {
        let counter = match stream {
            StreamKind::Definitions => &self.inner.definitions_stored,
            StreamKind::Facts => &self.inner.facts_stored,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            definitions_received: self.inner.definitions_received.load(Ordering::Relaxed),
            facts_received: self.inner.facts_received.load(Ordering::Relaxed),
            definitions_stored: self.inner.definitions_stored.load(Ordering::Relaxed),
            facts_stored: self.inner.facts_stored.load(Ordering::Relaxed),
        }
    }
}
