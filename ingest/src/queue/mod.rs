//! Queue sources the pipeline drains messages from.

pub mod base;
pub mod memory;
#[cfg(feature = "sqs")]
pub mod sqs;
