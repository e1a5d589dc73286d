//! Message transformation between wire payloads and storable documents.

use crate::bail;
use crate::error::{ErrorKind, IngestResult};
use crate::types::{InventoryFactRecord, PoolDefinition, PoolDefinitionMessage};

/// Parses a pool definitions message body into its embedded definitions.
///
/// Messages normally embed exactly one definition; several are processed
/// individually by the caller. A message with zero embedded definitions is
/// rejected so the persister can skip it without touching the store.
pub fn parse_definition_message(body: &str) -> IngestResult<Vec<PoolDefinition>> {
    let message: PoolDefinitionMessage = serde_json::from_str(body)?;

    if message.inventory_pools.is_empty() {
        bail!(
            ErrorKind::MissingDefinition,
            "Pool definitions message contains no definitions"
        );
    }

    Ok(message.inventory_pools)
}

/// Parses an inventory facts message body and flattens it into one record per
/// `(group, SKU entry)` pair.
///
/// A message whose groups contain no SKU entries at all produces no records
/// and is rejected as invalid.
pub fn flatten_fact_message(body: &str) -> IngestResult<Vec<InventoryFactRecord>> {
    let groups: Vec<crate::types::FactGroup> = serde_json::from_str(body)?;

    let records: Vec<InventoryFactRecord> = groups
        .iter()
        .flat_map(|group| {
            group
                .skus
                .iter()
                .map(|sku| InventoryFactRecord::from_group(group, sku))
        })
        .collect();

    if records.is_empty() {
        bail!(
            ErrorKind::InvalidData,
            "Inventory facts message contains no SKU entries"
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_message_yields_embedded_definitions() {
        let body = r#"{
            "inventoryPools": [
                { "id": "a", "brand": "x", "type": "retail", "country": [] },
                { "id": "b", "brand": "x", "type": "outlet", "country": [] }
            ]
        }"#;

        let definitions = parse_definition_message(body).unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].id, "a");
        assert_eq!(definitions[1].id, "b");
    }

    #[test]
    fn empty_definition_message_is_rejected() {
        let err = parse_definition_message(r#"{"inventoryPools": []}"#).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::MissingDefinition]);
    }

    #[test]
    fn malformed_definition_body_is_a_deserialization_error() {
        let err = parse_definition_message("not json").unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::DeserializationError]);
    }

    #[test]
    fn fact_message_flattens_to_one_record_per_sku() {
        let body = r#"[
            {
                "brand": "X",
                "docType": "fact",
                "pool": "P1",
                "productId": "SKU100",
                "skus": [
                    {
                        "skuId": "S1", "siteId": "site-1",
                        "availability": "in_stock", "backOrderLevel": 0,
                        "backorderable": "false", "shipmentDate": 20260901,
                        "stockLevel": 5, "storeStockLevel": 2
                    },
                    {
                        "skuId": "S2", "siteId": "site-1",
                        "availability": "out_of_stock", "backOrderLevel": 3,
                        "backorderable": "true", "shipmentDate": 20260905,
                        "stockLevel": 0, "storeStockLevel": 0
                    }
                ]
            },
            {
                "brand": "X",
                "docType": "fact",
                "pool": "P2",
                "productId": "SKU200",
                "skus": [
                    {
                        "skuId": "S3", "siteId": "site-2",
                        "availability": "in_stock", "backOrderLevel": 0,
                        "backorderable": "false", "shipmentDate": 20260901,
                        "stockLevel": 9, "storeStockLevel": 1
                    }
                ]
            }
        ]"#;

        let records = flatten_fact_message(body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].key().storage_key(), "X:P1:SKU100:S1");
        assert_eq!(records[1].key().storage_key(), "X:P1:SKU100:S2");
        assert_eq!(records[2].key().storage_key(), "X:P2:SKU200:S3");
        assert_eq!(records[1].back_order_level, 3);
    }

    #[test]
    fn fact_message_without_sku_entries_is_rejected() {
        let body = r#"[
            { "brand": "X", "docType": "fact", "pool": "P1", "productId": "SKU100", "skus": [] }
        ]"#;

        let err = flatten_fact_message(body).unwrap_err();
        assert_eq!(err.kinds(), vec![ErrorKind::InvalidData]);
    }
}
