use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Queue service connection settings.
///
/// Mirrors the layout of the original deployment: a base queue URL that is
/// combined with the account number and a per-stream queue name, or, when
/// `endpoint` is set, a local development endpoint that serves queues directly
/// under the base URL.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AmazonConfig {
    /// AWS region the queues live in.
    pub region: String,
    /// Optional local/dev endpoint. When set, the service connects to this
    /// endpoint instead of the production queue service.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Base queue URL. Queue names are appended to this to form the full URL.
    pub queue_url: String,
    /// Account number inserted between the base URL and the queue name in
    /// production. Required when no dev endpoint is configured.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Name of the inventory facts queue.
    pub facts_queue_name: String,
    /// Name of the pool definitions queue.
    pub pools_queue_name: String,
}

impl AmazonConfig {
    /// Builds the full queue URL for the given queue name.
    ///
    /// With a dev endpoint the queue name is appended directly to the base URL.
    /// In production the account number is inserted between the two.
    pub fn queue_url_for(&self, queue_name: &str) -> String {
        match (&self.endpoint, &self.account_number) {
            (Some(_), _) | (None, None) => format!("{}{}", self.queue_url, queue_name),
            (None, Some(account_number)) => {
                format!("{}{}/{}", self.queue_url, account_number, queue_name)
            }
        }
    }

    /// Validates queue service settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.region.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "amazon.region".to_string(),
                constraint: "must not be empty".to_string(),
            });
        }

        if self.queue_url.is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "amazon.queue_url".to_string(),
                constraint: "must not be empty".to_string(),
            });
        }

        if self.endpoint.is_none() && self.account_number.is_none() {
            return Err(ValidationError::InvalidFieldValue {
                field: "amazon.account_number".to_string(),
                constraint: "required when no dev endpoint is configured".to_string(),
            });
        }

        Ok(())
    }
}
