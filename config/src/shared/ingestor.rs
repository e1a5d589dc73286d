use serde::{Deserialize, Serialize};

use crate::shared::{AmazonConfig, MongoConfig, ValidationError};

/// Parallelism settings for the two ingestion streams.
///
/// Each stream runs this many (poller, persister) worker pairs, every pair
/// with its own dispatch channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Number of worker pairs draining the pool definitions queue.
    #[serde(default = "default_worker_pairs")]
    pub num_definition_workers: u16,
    /// Number of worker pairs draining the inventory facts queue.
    #[serde(default = "default_worker_pairs")]
    pub num_facts_workers: u16,
}

impl AppConfig {
    /// Default parallelism degree per stream.
    pub const DEFAULT_WORKER_PAIRS: u16 = 1;

    /// Validates parallelism settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.num_definition_workers == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "app.num_definition_workers".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        if self.num_facts_workers == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "app.num_facts_workers".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            num_definition_workers: default_worker_pairs(),
            num_facts_workers: default_worker_pairs(),
        }
    }
}

fn default_worker_pairs() -> u16 {
    AppConfig::DEFAULT_WORKER_PAIRS
}

/// Settings for the status page.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StatusConfig {
    /// Port the status endpoint listens on.
    #[serde(default = "default_status_port")]
    pub port: u16,
}

impl StatusConfig {
    /// Default port for the status endpoint.
    pub const DEFAULT_PORT: u16 = 10443;
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            port: default_status_port(),
        }
    }
}

fn default_status_port() -> u16 {
    StatusConfig::DEFAULT_PORT
}

/// Top-level configuration for the ingestor service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IngestorConfig {
    /// Queue service settings.
    pub amazon: AmazonConfig,
    /// Worker parallelism settings.
    #[serde(default)]
    pub app: AppConfig,
    /// Document store settings.
    pub mongo: MongoConfig,
    /// Status page settings.
    #[serde(default)]
    pub status: StatusConfig,
}

impl IngestorConfig {
    /// Validates the full service configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.amazon.validate()?;
        self.app.validate()?;
        self.mongo.validate()?;

        Ok(())
    }
}
