#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use ingest::bail;
use ingest::error::{ErrorKind, IngestResult};
use ingest::pipeline::StreamConfig;
use ingest::store::base::DocumentStore;
use ingest::store::memory::MemoryStore;
use ingest::types::StreamKind;
use serde_json::json;

pub const DEFINITIONS_QUEUE_URL: &str = "memory://definitions";
pub const FACTS_QUEUE_URL: &str = "memory://facts";
pub const DEFINITIONS_COLLECTION: &str = "pool_definitions";
pub const FACTS_COLLECTION: &str = "inventory_facts";

/// Polls a predicate until it holds, failing the test after a few seconds.
pub async fn wait_until(mut predicate: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);

    while !predicate() {
        if Instant::now() > deadline {
            panic!("condition was not met within the timeout");
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub fn stream_config(stream: StreamKind, num_workers: usize) -> StreamConfig {
    match stream {
        StreamKind::Definitions => StreamConfig {
            stream,
            queue_url: DEFINITIONS_QUEUE_URL.to_string(),
            collection: DEFINITIONS_COLLECTION.to_string(),
            num_workers,
        },
        StreamKind::Facts => StreamConfig {
            stream,
            queue_url: FACTS_QUEUE_URL.to_string(),
            collection: FACTS_COLLECTION.to_string(),
            num_workers,
        },
    }
}

/// Builds a pool definitions message body with a single embedded definition.
pub fn definition_body(id: &str, pool_type: &str) -> String {
    json!({
        "inventoryPools": [{
            "id": id,
            "brand": "acme",
            "type": pool_type,
            "country": [{ "countryCode": "DE", "regions": ["BY"] }]
        }]
    })
    .to_string()
}

/// Builds an inventory facts message body with one group covering the given
/// SKU identifiers.
pub fn fact_body(brand: &str, pool: &str, product_id: &str, sku_ids: &[&str]) -> String {
    let skus: Vec<_> = sku_ids
        .iter()
        .map(|sku_id| {
            json!({
                "skuId": sku_id,
                "siteId": "site-1",
                "availability": "in_stock",
                "backOrderLevel": 0,
                "backorderable": "false",
                "shipmentDate": 20260901,
                "stockLevel": 5,
                "storeStockLevel": 2
            })
        })
        .collect();

    json!([{
        "brand": brand,
        "docType": "fact",
        "pool": pool,
        "productId": product_id,
        "skus": skus
    }])
    .to_string()
}

/// A [`MemoryStore`] wrapper that fails a configurable number of upcoming
/// writes, for exercising the drop-on-write-failure path.
#[derive(Debug, Clone)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_next: Arc<AtomicU64>,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_next: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn fail_next_writes(&self, count: u64) {
        self.fail_next.store(count, Ordering::SeqCst);
    }
}

impl DocumentStore for FlakyStore {
    fn name(&self) -> &'static str {
        "flaky-memory"
    }

    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: serde_json::Value,
    ) -> IngestResult<()> {
        if self.fail_next.load(Ordering::SeqCst) > 0 {
            self.fail_next.fetch_sub(1, Ordering::SeqCst);
            bail!(ErrorKind::StoreWriteFailed, "Injected write failure");
        }

        self.inner.upsert(collection, key, document).await
    }
}
