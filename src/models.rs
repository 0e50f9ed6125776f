use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the "Bill of Material Details" snapshot: component required to
/// build one unit of the parent item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BomEdge {
    #[serde(alias = "PARENT_ITEM")]
    pub parent_item_id: String,
    #[serde(alias = "COMPONENT_ITEM")]
    pub component_item_id: String,
    /// Quantity of component consumed per one unit of parent. Non-negative.
    #[serde(alias = "QTY_PER")]
    pub quantity_per_parent: Decimal,
}

/// One row of the inventory snapshot table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemRecord {
    #[serde(alias = "ITEM_ID")]
    pub item_id: String,
    #[serde(alias = "DESCRIPTION", default)]
    pub description: String,
    #[serde(alias = "ON_HAND", default)]
    pub on_hand_quantity: Decimal,
    #[serde(alias = "UNIT_COST", default)]
    pub unit_cost: Decimal,
    #[serde(alias = "UOM", default)]
    pub unit_of_measure: String,
}

/// Canonical key for item lookups. The upstream ERP export is inconsistently
/// cased and sometimes padded, so every comparison goes through this.
pub fn normalize_item_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}
