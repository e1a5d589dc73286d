use mongodb::Client;
use mongodb::bson::{Document, doc};

use crate::error::{ErrorKind, IngestResult};
use crate::ingest_error;
use crate::store::base::DocumentStore;

/// A MongoDB-backed [`DocumentStore`].
///
/// Holds a driver client, which maintains its own connection pool shared by
/// all clones, so every persister worker reuses the same pooled connections.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    /// Connects to the deployment at `connection_string` and verifies it is
    /// reachable before returning.
    pub async fn connect(connection_string: &str, database: &str) -> IngestResult<Self> {
        let client = Client::with_uri_str(connection_string).await?;

        // The driver connects lazily, so issue a ping to fail fast on an
        // unreachable deployment.
        client
            .database(database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| {
                ingest_error!(
                    ErrorKind::StoreConnectionFailed,
                    "Failed to reach MongoDB deployment",
                    format!("database '{database}'"),
                    source: err
                )
            })?;

        Ok(Self {
            client,
            database: database.to_string(),
        })
    }
}

impl DocumentStore for MongoStore {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: serde_json::Value,
    ) -> IngestResult<()> {
        let mut replacement: Document = mongodb::bson::to_document(&document).map_err(|err| {
            ingest_error!(
                ErrorKind::SerializationError,
                "Failed to convert document to BSON",
                format!("collection '{collection}', key '{key}'"),
                source: err
            )
        })?;
        replacement.insert("_id", key);

        self.client
            .database(&self.database)
            .collection::<Document>(collection)
            .replace_one(doc! { "_id": key }, replacement)
            .upsert(true)
            .await?;

        Ok(())
    }
}
