use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Document store connection settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MongoConfig {
    /// Host and port of the MongoDB instance, e.g. `localhost:27017`.
    pub host_and_port: String,
    /// Name of the database holding both collections.
    pub database: String,
    /// Collection for flattened inventory fact records.
    pub facts_collection: String,
    /// Collection for pool definition documents.
    pub pools_collection: String,
}

impl MongoConfig {
    /// Builds the MongoDB connection string for this configuration.
    pub fn connection_string(&self) -> String {
        format!("mongodb://{}", self.host_and_port)
    }

    /// Validates document store settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("mongo.host_and_port", &self.host_and_port),
            ("mongo.database", &self.database),
            ("mongo.facts_collection", &self.facts_collection),
            ("mongo.pools_collection", &self.pools_collection),
        ] {
            if value.is_empty() {
                return Err(ValidationError::InvalidFieldValue {
                    field: field.to_string(),
                    constraint: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_string_uses_host_and_port() {
        let config = MongoConfig {
            host_and_port: "localhost:27017".to_string(),
            database: "inventory".to_string(),
            facts_collection: "facts".to_string(),
            pools_collection: "pools".to_string(),
        };

        assert_eq!(config.connection_string(), "mongodb://localhost:27017");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_collection_name_fails_validation() {
        let config = MongoConfig {
            host_and_port: "localhost:27017".to_string(),
            database: "inventory".to_string(),
            facts_collection: String::new(),
            pools_collection: "pools".to_string(),
        };

        assert!(config.validate().is_err());
    }
}
