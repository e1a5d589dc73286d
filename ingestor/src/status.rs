use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use ingest::stats::StatsRegistry;
use serde::Serialize;
use tracing::error;

/// Live throughput counters as served by the status endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    pool_definitions_received: u64,
    pool_definitions_stored: u64,
    inventory_facts_received: u64,
    inventory_facts_stored: u64,
}

#[get("/stats")]
async fn stats(registry: web::Data<StatsRegistry>) -> impl Responder {
    let snapshot = registry.snapshot();

    HttpResponse::Ok().json(StatsResponse {
        pool_definitions_received: snapshot.definitions_received,
        pool_definitions_stored: snapshot.definitions_stored,
        inventory_facts_received: snapshot.facts_received,
        inventory_facts_stored: snapshot.facts_stored,
    })
}

/// Binds the status server on all interfaces and spawns it onto the runtime.
///
/// The returned handle stops the server; signal handling is left to the
/// pipelines so the status page stays up while they drain.
pub fn spawn_status_server(
    port: u16,
    stats_registry: StatsRegistry,
) -> std::io::Result<ServerHandle> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(stats_registry.clone()))
            .service(stats)
    })
    .bind(("0.0.0.0", port))?
    .disable_signals()
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(err) = server.await {
            error!(error = %err, "status server terminated with an error");
        }
    });

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use ingest::types::StreamKind;

    use super::*;

    #[actix_web::test]
    async fn stats_endpoint_reports_current_counters() {
        let registry = StatsRegistry::new();
        registry.record_received(StreamKind::Definitions);
        registry.record_received(StreamKind::Facts);
        registry.record_stored(StreamKind::Facts);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(registry))
                .service(stats),
        )
        .await;

        let request = test::TestRequest::get().uri("/stats").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(body["poolDefinitionsReceived"], 1);
        assert_eq!(body["poolDefinitionsStored"], 0);
        assert_eq!(body["inventoryFactsReceived"], 1);
        assert_eq!(body["inventoryFactsStored"], 1);
    }
}
