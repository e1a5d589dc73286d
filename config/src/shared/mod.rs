mod amazon;
mod ingestor;
mod mongo;

use thiserror::Error;

pub use amazon::AmazonConfig;
pub use ingestor::{AppConfig, IngestorConfig, StatusConfig};
pub use mongo::MongoConfig;

/// Errors raised when a configuration value fails validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field value violates one of its constraints.
    #[error("invalid value for `{field}`: {constraint}")]
    InvalidFieldValue { field: String, constraint: String },
}
