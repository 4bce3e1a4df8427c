//! HTTP handlers for storage billing alerts

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{PaginatedResponse, Pagination, StorageAlertView};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::StorageAlertService;
use crate::AppState;

/// Page selection for list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn to_pagination(&self, default_per_page: u32) -> Pagination {
        Pagination::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(default_per_page),
        )
    }
}

/// List storage billing alerts, most urgent first
pub async fn list_storage_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<StorageAlertView>>> {
    let scope = current_user.0.client_scope()?;
    let pagination = query.to_pagination(state.config.alerts.default_page_size);

    let service = StorageAlertService::new(state.db);
    let page = service.get_alert_page(scope, &pagination).await?;
    Ok(Json(page))
}
