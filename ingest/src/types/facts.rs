use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-SKU inventory fields as they arrive inside a fact group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuEntry {
    pub sku_id: String,
    pub site_id: String,
    pub availability: String,
    pub back_order_level: i64,
    pub backorderable: String,
    pub shipment_date: i64,
    pub stock_level: i64,
    pub store_stock_level: i64,
}

/// One fact group inside an inventory facts queue message.
///
/// A single queue message carries a list of groups; each group shares its
/// identifying fields across all embedded SKU entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactGroup {
    pub brand: String,
    pub doc_type: String,
    pub pool: String,
    pub product_id: String,
    #[serde(default)]
    pub skus: Vec<SkuEntry>,
}

/// The flattened, storable inventory fact: one record per
/// `(brand, pool, product id, SKU id)` combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFactRecord {
    pub brand: String,
    pub doc_type: String,
    pub pool: String,
    pub product_id: String,
    pub sku_id: String,
    pub site_id: String,
    pub availability: String,
    pub back_order_level: i64,
    pub backorderable: String,
    pub shipment_date: i64,
    pub stock_level: i64,
    pub store_stock_level: i64,
}

impl InventoryFactRecord {
    /// Materializes a record from a group's shared fields and one SKU entry.
    pub fn from_group(group: &FactGroup, sku: &SkuEntry) -> Self {
        Self {
            brand: group.brand.clone(),
            doc_type: group.doc_type.clone(),
            pool: group.pool.clone(),
            product_id: group.product_id.clone(),
            sku_id: sku.sku_id.clone(),
            site_id: sku.site_id.clone(),
            availability: sku.availability.clone(),
            back_order_level: sku.back_order_level,
            backorderable: sku.backorderable.clone(),
            shipment_date: sku.shipment_date,
            stock_level: sku.stock_level,
            store_stock_level: sku.store_stock_level,
        }
    }

    /// Returns the structured storage key identifying this record.
    pub fn key(&self) -> FactRecordKey {
        FactRecordKey {
            brand: self.brand.clone(),
            pool: self.pool.clone(),
            product_id: self.product_id.clone(),
            sku_id: self.sku_id.clone(),
        }
    }
}

/// Structured, delimiter-safe storage key for an [`InventoryFactRecord`].
///
/// The rendered key joins the four fields with `:` after percent-escaping any
/// `%` and `:` occurring inside field values, so two different field
/// combinations can never collide on the same rendered key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactRecordKey {
    pub brand: String,
    pub pool: String,
    pub product_id: String,
    pub sku_id: String,
}

impl FactRecordKey {
    /// Renders the key into its unambiguous string form used as the store's
    /// document identity.
    pub fn storage_key(&self) -> String {
        [&self.brand, &self.pool, &self.product_id, &self.sku_id]
            .map(|field| escape_key_field(field))
            .join(":")
    }
}

impl fmt::Display for FactRecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// Escapes the key separator and the escape character itself.
fn escape_key_field(field: &str) -> String {
    field.replace('%', "%25").replace(':', "%3A")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(sku_id: &str) -> SkuEntry {
        SkuEntry {
            sku_id: sku_id.to_string(),
            site_id: "site-1".to_string(),
            availability: "in_stock".to_string(),
            back_order_level: 0,
            backorderable: "false".to_string(),
            shipment_date: 20260901,
            stock_level: 5,
            store_stock_level: 2,
        }
    }

    #[test]
    fn record_copies_group_and_sku_fields() {
        let group = FactGroup {
            brand: "X".to_string(),
            doc_type: "fact".to_string(),
            pool: "P1".to_string(),
            product_id: "SKU100".to_string(),
            skus: vec![sku("S1")],
        };

        let record = InventoryFactRecord::from_group(&group, &group.skus[0]);

        assert_eq!(record.brand, "X");
        assert_eq!(record.doc_type, "fact");
        assert_eq!(record.sku_id, "S1");
        assert_eq!(record.stock_level, 5);
        assert_eq!(record.key().storage_key(), "X:P1:SKU100:S1");
    }

    #[test]
    fn storage_key_escapes_separator_in_field_values() {
        let key = FactRecordKey {
            brand: "X:Y".to_string(),
            pool: "P1".to_string(),
            product_id: "100%".to_string(),
            sku_id: "S1".to_string(),
        };

        assert_eq!(key.storage_key(), "X%3AY:P1:100%25:S1");

        // The ambiguous concatenation would collide with a key whose brand is
        // "X" and pool is "Y"; the escaped form cannot.
        let other = FactRecordKey {
            brand: "X".to_string(),
            pool: "Y".to_string(),
            product_id: "P1".to_string(),
            sku_id: "100%".to_string(),
        };
        assert_ne!(key.storage_key(), other.storage_key());
    }

    #[test]
    fn fact_group_parses_wire_format() {
        let raw = r#"{
            "brand": "X",
            "docType": "fact",
            "pool": "P1",
            "productId": "SKU100",
            "skus": [{
                "skuId": "S1",
                "siteId": "site-1",
                "availability": "in_stock",
                "backOrderLevel": 0,
                "backorderable": "false",
                "shipmentDate": 20260901,
                "stockLevel": 5,
                "storeStockLevel": 2
            }]
        }"#;

        let group: FactGroup = serde_json::from_str(raw).unwrap();
        assert_eq!(group.product_id, "SKU100");
        assert_eq!(group.skus[0].stock_level, 5);
    }
}
