//! Document stores the pipeline persists normalized documents into.

pub mod base;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongodb;
