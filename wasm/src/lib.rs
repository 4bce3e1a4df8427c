//! WebAssembly module for the Logistics Portal
//!
//! Lets the dashboard compute storage billing alerts and stock totals from
//! data it already holds, without another round trip to the API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::storage::*;
pub use shared::types::*;

fn parse_json<'a, T: serde::Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, JsValue> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| JsValue::from_str(&format!("Invalid timestamp '{}': {}", value, e)))
}

/// Storage alerts for a JSON array of orders, evaluated at `now` (RFC 3339).
/// Each alert carries its `level` and `invoice_hint` for display.
#[wasm_bindgen]
pub fn compute_storage_alerts_at(orders_json: &str, now: &str) -> Result<String, JsValue> {
    let orders: Vec<Order> = parse_json(orders_json, "orders")?;
    let now = parse_instant(now)?;
    let views: Vec<StorageAlertView> = shared::compute_storage_alerts(&orders, now)
        .into_iter()
        .map(StorageAlertView::from)
        .collect();
    to_json(&views)
}

/// Storage alerts evaluated at the browser's current time
#[wasm_bindgen]
pub fn compute_storage_alerts(orders_json: &str) -> Result<String, JsValue> {
    let now: String = js_sys::Date::new_0().to_iso_string().into();
    compute_storage_alerts_at(orders_json, &now)
}

/// Stock totals for a JSON array of inventory lines
#[wasm_bindgen]
pub fn summarize_inventory(items_json: &str) -> Result<String, JsValue> {
    let items: Vec<InventoryItem> = parse_json(items_json, "inventory")?;
    to_json(&shared::summarize_inventory(&items))
}

/// Whole days between two RFC 3339 timestamps, rounded down
#[wasm_bindgen]
pub fn days_between(from: &str, to: &str) -> Result<i64, JsValue> {
    Ok(whole_days_between(parse_instant(from)?, parse_instant(to)?))
}
