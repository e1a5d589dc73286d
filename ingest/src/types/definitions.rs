use serde::{Deserialize, Serialize};

/// Countries and regions a merchandising pool applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRegions {
    pub country_code: String,
    #[serde(default)]
    pub regions: Vec<String>,
}

/// A merchandising pool definition.
///
/// The `id` is globally unique and serves as the storage key: a later message
/// with the same `id` fully replaces the stored document (last-write-wins,
/// no merge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDefinition {
    pub id: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub pool_type: String,
    #[serde(default)]
    pub country: Vec<CountryRegions>,
}

/// Envelope of a pool definitions queue message.
///
/// Upstream normally embeds exactly one definition per message, but the list
/// shape allows zero or several; the transformer decides how to handle those
/// cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDefinitionMessage {
    #[serde(default)]
    pub inventory_pools: Vec<PoolDefinition>,
}
