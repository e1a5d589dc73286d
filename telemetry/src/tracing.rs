use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes tracing for a service binary.
///
/// Installs a fmt subscriber with an env-filter that defaults to `info` when
/// `RUST_LOG` is not set.
pub fn init_tracing(service: &str) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .try_init()?;

    tracing::info!(service, "tracing initialized");

    Ok(())
}

/// Initializes tracing for tests.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_test_writer())
            .try_init();
    });
}
