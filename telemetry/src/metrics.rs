use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Default port the Prometheus scrape endpoint listens on.
const METRICS_PORT: u16 = 9000;

/// Initializes metrics with an automatic HTTP server on port 9000.
///
/// Installs a global metrics recorder and starts an HTTP server listening on
/// `[::]:9000/metrics`, making counters emitted through the `metrics` macros
/// available for Prometheus scraping. The optional `service` label is attached
/// to every metric.
pub fn init_metrics(service: Option<&str>) -> Result<(), BuildError> {
    let mut builder = PrometheusBuilder::new().with_http_listener(SocketAddr::new(
        IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        METRICS_PORT,
    ));

    if let Some(service) = service {
        builder = builder.add_global_label("service", service);
    }

    builder.install()?;

    Ok(())
}
