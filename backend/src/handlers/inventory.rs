//! HTTP handlers for warehouse stock

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{paginate, InventoryFilter, InventoryItem, InventoryTotals, PaginatedResponse, Pagination, Warehouse};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::InventoryService;
use crate::AppState;

/// Query parameters for the stock listing
#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub warehouse_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl InventoryQuery {
    fn filter(&self) -> InventoryFilter {
        InventoryFilter {
            warehouse_id: self.warehouse_id,
            client_id: self.client_id,
            search: self.search.clone(),
        }
    }
}

/// List warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Warehouse>>> {
    let service = InventoryService::new(state.db);
    let warehouses = service.list_warehouses().await?;
    Ok(Json(warehouses))
}

/// List stocked lines
pub async fn list_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<PaginatedResponse<InventoryItem>>> {
    let scope = current_user.0.client_scope()?;
    let pagination = Pagination::new(
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(state.config.alerts.default_page_size),
    );

    let service = InventoryService::new(state.db);
    let items = service.list_inventory(&query.filter(), scope).await?;
    Ok(Json(paginate(items, &pagination)))
}

/// Stock totals visible to the caller
pub async fn get_inventory_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<InventoryTotals>> {
    let scope = current_user.0.client_scope()?;
    let service = InventoryService::new(state.db);
    let totals = service.get_totals(scope).await?;
    Ok(Json(totals))
}
