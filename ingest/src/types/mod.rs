//! Wire and storage types for the two ingestion streams.

mod definitions;
mod facts;

use std::fmt;

pub use definitions::{CountryRegions, PoolDefinition, PoolDefinitionMessage};
pub use facts::{FactGroup, FactRecordKey, InventoryFactRecord, SkuEntry};

/// One of the two independent message categories handled by the service.
///
/// Each stream has its own queue, parallelism degree, and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Merchandising pool definitions.
    Definitions,
    /// Flattened per-SKU inventory facts.
    Facts,
}

impl StreamKind {
    /// Returns the stable string name of the stream, used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Definitions => "definitions",
            StreamKind::Facts => "facts",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
