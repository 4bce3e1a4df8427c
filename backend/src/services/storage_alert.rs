//! Storage billing alert service
//!
//! Fetches the open-order snapshot and ranks it with the shared calculator.

use chrono::{DateTime, Utc};
use shared::{
    compute_storage_alerts, paginate, PaginatedResponse, Pagination, StorageAlert, StorageAlertView,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::OrderService;

/// Service producing billing alerts for open orders
#[derive(Clone)]
pub struct StorageAlertService {
    orders: OrderService,
}

impl StorageAlertService {
    /// Create a new StorageAlertService instance
    pub fn new(db: PgPool) -> Self {
        Self {
            orders: OrderService::new(db),
        }
    }

    /// All alerts as of `now`, ranked by urgency
    pub async fn get_alerts(
        &self,
        client_scope: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<StorageAlert>> {
        let orders = self.orders.list_active_orders(client_scope).await?;
        let alerts = compute_storage_alerts(&orders, now);

        tracing::info!(
            active_orders = orders.len(),
            alerts = alerts.len(),
            overdue = alerts.iter().filter(|a| a.is_overdue).count(),
            "storage alerts computed"
        );

        Ok(alerts)
    }

    /// One page of alerts as of the current time, with dashboard labels
    pub async fn get_alert_page(
        &self,
        client_scope: Option<Uuid>,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<StorageAlertView>> {
        let alerts = self.get_alerts(client_scope, Utc::now()).await?;
        let views = alerts.into_iter().map(StorageAlertView::from).collect();
        Ok(paginate(views, pagination))
    }
}
