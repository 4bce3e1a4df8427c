//! Warehouse inventory models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::matches_search;

/// Current stock of one order in one warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub order_id: Uuid,
    pub order_code: String,
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub product: Option<String>,
    pub packages: i32,
    pub current_weight_kg: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Dashboard totals across stocked items
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryTotals {
    pub total_packages: i64,
    pub total_weight_kg: Decimal,
    /// Number of distinct stock lines (order/warehouse pairs)
    pub total_references: u64,
}

/// Filters applied to the inventory listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryFilter {
    pub warehouse_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub search: Option<String>,
}

impl InventoryItem {
    /// Only lines with positive stock are shown
    pub fn is_stocked(&self) -> bool {
        self.packages > 0
    }
}

/// Sum packages and weight over stocked items
pub fn summarize_inventory(items: &[InventoryItem]) -> InventoryTotals {
    items
        .iter()
        .filter(|item| item.is_stocked())
        .fold(InventoryTotals::default(), |mut totals, item| {
            totals.total_packages += i64::from(item.packages);
            totals.total_weight_kg += item.current_weight_kg;
            totals.total_references += 1;
            totals
        })
}

/// Keep stocked items matching every filter that is set
pub fn filter_inventory(items: Vec<InventoryItem>, filter: &InventoryFilter) -> Vec<InventoryItem> {
    let search = filter.search.as_deref().unwrap_or("");

    items
        .into_iter()
        .filter(InventoryItem::is_stocked)
        .filter(|item| filter.warehouse_id.map_or(true, |id| item.warehouse_id == id))
        .filter(|item| filter.client_id.map_or(true, |id| item.client_id == Some(id)))
        .filter(|item| {
            matches_search(
                search,
                &[
                    item.order_code.as_str(),
                    item.product.as_deref().unwrap_or(""),
                    item.client_name.as_str(),
                ],
            )
        })
        .collect()
}
