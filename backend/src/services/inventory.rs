//! Inventory service for warehouse stock listings and totals

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{filter_inventory, summarize_inventory, InventoryFilter, InventoryItem, InventoryTotals, Warehouse};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;

/// Inventory service for stock queries
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct InventoryRow {
    id: Uuid,
    warehouse_id: Uuid,
    warehouse_name: String,
    order_id: Uuid,
    order_code: String,
    client_id: Option<Uuid>,
    client_name: String,
    product: Option<String>,
    packages: i32,
    current_weight_kg: Decimal,
    updated_at: DateTime<Utc>,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem {
            id: row.id,
            warehouse_id: row.warehouse_id,
            warehouse_name: row.warehouse_name,
            order_id: row.order_id,
            order_code: row.order_code,
            client_id: row.client_id,
            client_name: row.client_name,
            product: row.product,
            packages: row.packages,
            current_weight_kg: row.current_weight_kg,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct WarehouseRow {
    id: Uuid,
    name: String,
    code: String,
    location: Option<String>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all warehouses by name
    pub async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        let rows = sqlx::query_as::<_, WarehouseRow>(
            "SELECT id, name, code, location FROM warehouses ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Warehouse {
                id: r.id,
                name: r.name,
                code: r.code,
                location: r.location,
            })
            .collect())
    }

    /// Stocked lines matching the filter, most recently updated first
    pub async fn list_inventory(
        &self,
        filter: &InventoryFilter,
        client_scope: Option<Uuid>,
    ) -> AppResult<Vec<InventoryItem>> {
        let items = self.fetch_stock(client_scope).await?;
        Ok(filter_inventory(items, filter))
    }

    /// Totals over all stocked lines visible to the caller
    pub async fn get_totals(&self, client_scope: Option<Uuid>) -> AppResult<InventoryTotals> {
        let items = self.fetch_stock(client_scope).await?;
        Ok(summarize_inventory(&items))
    }

    async fn fetch_stock(&self, client_scope: Option<Uuid>) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT i.id, i.warehouse_id, w.name AS warehouse_name,
                   i.order_id, o.code AS order_code, o.client_id,
                   COALESCE(c.name, '---') AS client_name, o.product,
                   i.packages, i.current_weight_kg, i.updated_at
            FROM inventory i
            JOIN warehouses w ON w.id = i.warehouse_id
            JOIN orders o ON o.id = i.order_id
            LEFT JOIN clients c ON c.id = o.client_id
            WHERE i.packages > 0
              AND ($1::uuid IS NULL OR o.client_id = $1)
            ORDER BY i.updated_at DESC
            "#,
        )
        .bind(client_scope)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }
}
