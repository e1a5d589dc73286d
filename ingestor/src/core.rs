use anyhow::Context;
use config::shared::IngestorConfig;
use ingest::pipeline::{StreamConfig, StreamPipeline};
use ingest::queue::sqs::SqsQueue;
use ingest::stats::StatsRegistry;
use ingest::store::mongodb::MongoStore;
use ingest::types::StreamKind;
use tracing::{error, info};

use crate::status::spawn_status_server;

/// Starts both ingestion pipelines and runs them until SIGINT.
pub async fn start_ingestor(config: IngestorConfig) -> anyhow::Result<()> {
    let queue = SqsQueue::connect(&config.amazon.region, config.amazon.endpoint.as_deref())
        .await
        .context("failed to connect to the queue service")?;
    let store = MongoStore::connect(&config.mongo.connection_string(), &config.mongo.database)
        .await
        .context("failed to connect to the document store")?;

    let stats = StatsRegistry::new();
    let status_server = spawn_status_server(config.status.port, stats.clone())
        .context("failed to bind the status server")?;

    let mut definitions = StreamPipeline::new(
        StreamConfig {
            stream: StreamKind::Definitions,
            queue_url: config.amazon.queue_url_for(&config.amazon.pools_queue_name),
            collection: config.mongo.pools_collection.clone(),
            num_workers: usize::from(config.app.num_definition_workers),
        },
        queue.clone(),
        store.clone(),
        stats.clone(),
    );
    let mut facts = StreamPipeline::new(
        StreamConfig {
            stream: StreamKind::Facts,
            queue_url: config.amazon.queue_url_for(&config.amazon.facts_queue_name),
            collection: config.mongo.facts_collection.clone(),
            num_workers: usize::from(config.app.num_facts_workers),
        },
        queue,
        store,
        stats,
    );

    definitions.start();
    facts.start();

    let definitions_shutdown = definitions.shutdown_tx();
    let facts_shutdown = facts.shutdown_tx();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for the termination signal");
            return;
        }

        info!("termination signal received, shutting down pipelines");
        let _ = definitions_shutdown.shutdown();
        let _ = facts_shutdown.shutdown();
    });

    let (definitions_result, facts_result) = tokio::join!(definitions.wait(), facts.wait());

    status_server.stop(true).await;

    definitions_result.context("pool definitions pipeline failed")?;
    facts_result.context("inventory facts pipeline failed")?;

    info!("ingestor terminated");

    Ok(())
}
