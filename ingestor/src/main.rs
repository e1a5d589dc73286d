//! Inventory ingestion service binary.
//!
//! Drains the pool definitions and inventory facts queues into the document
//! store, exposes live throughput counters over HTTP, and shuts down
//! gracefully on SIGINT.

use config::load::load_config;
use config::shared::IngestorConfig;
use telemetry::metrics::init_metrics;
use telemetry::tracing::init_tracing;

mod core;
mod status;

/// Entry point for the ingestor service.
///
/// Loads and validates configuration, initializes tracing and metrics, then
/// starts the async runtime and launches the ingestion pipelines.
fn main() -> anyhow::Result<()> {
    let ingestor_config: IngestorConfig = load_config()?;
    ingestor_config.validate()?;

    init_tracing(env!("CARGO_BIN_NAME"))?;
    init_metrics(Some(env!("CARGO_BIN_NAME")))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(core::start_ingestor(ingestor_config))?;

    Ok(())
}
