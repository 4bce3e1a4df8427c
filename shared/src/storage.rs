//! Storage billing alerts
//!
//! Goods held in a warehouse get [`FREE_STORAGE_DAYS`] days of free storage
//! counted from the order's first intake. Past that boundary the client is
//! invoiced per started 30-day period. This module flags open orders that are
//! within [`ALERT_LOOKAHEAD_DAYS`] of the first boundary or already past it.
//!
//! Everything here is pure: the evaluation instant is always passed in.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{MovementKind, Order};

/// Length of the free storage window and of each billing period
pub const FREE_STORAGE_DAYS: i64 = 30;

/// How far ahead of the boundary an order starts being flagged
pub const ALERT_LOOKAHEAD_DAYS: i64 = 10;

/// An order that needs billing attention
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageAlert {
    pub order_id: Uuid,
    pub order_code: String,
    pub client_name: String,
    /// Timestamp of the earliest intake movement
    pub arrival_date: DateTime<Utc>,
    pub arrival_date_display: String,
    pub days_elapsed: i64,
    /// Days until the 30-day boundary; 0 once it is reached
    pub days_remaining: i64,
    /// Completed 30-day periods since arrival
    pub months_billable: i64,
    pub is_overdue: bool,
}

/// Alert as shown on the dashboard, with its urgency bucket and display text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageAlertView {
    #[serde(flatten)]
    pub alert: StorageAlert,
    pub level: AlertLevel,
    pub invoice_hint: String,
}

impl From<StorageAlert> for StorageAlertView {
    fn from(alert: StorageAlert) -> Self {
        Self {
            level: alert.level(),
            invoice_hint: alert.invoice_hint(),
            alert,
        }
    }
}

/// Urgency bucket of an alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Overdue,
    NearBoundary,
}

impl StorageAlert {
    pub fn level(&self) -> AlertLevel {
        if self.is_overdue {
            AlertLevel::Overdue
        } else {
            AlertLevel::NearBoundary
        }
    }

    /// Short text for the dashboard list
    pub fn invoice_hint(&self) -> String {
        match self.level() {
            AlertLevel::Overdue => match self.months_billable {
                1 => "1 month to invoice".to_string(),
                n => format!("{} months to invoice", n),
            },
            AlertLevel::NearBoundary => match self.days_remaining {
                0 => "billing boundary today".to_string(),
                1 => "1 day to billing boundary".to_string(),
                n => format!("{} days to billing boundary", n),
            },
        }
    }
}

/// Whole days from `from` to `to`, rounded toward negative infinity
pub fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let delta = to - from;
    // num_days truncates toward zero, so step back for a partial negative day
    let days = delta.num_days();
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Earliest intake timestamp of an order
pub fn arrival_date(order: &Order) -> Option<DateTime<Utc>> {
    order
        .movements_of(MovementKind::Intake)
        .map(|m| m.occurred_at)
        .min()
}

/// Whether any goods have left storage for this order
pub fn has_dispatch(order: &Order) -> bool {
    order.movements_of(MovementKind::Dispatch).next().is_some()
}

/// Evaluate a single order; `None` when it needs no attention
pub fn evaluate_order(order: &Order, now: DateTime<Utc>) -> Option<StorageAlert> {
    // Once dispatch starts, billing is settled elsewhere.
    if !order.is_active || has_dispatch(order) {
        return None;
    }

    let arrival = arrival_date(order)?;
    let days_elapsed = whole_days_between(arrival, now);
    let days_to_boundary = FREE_STORAGE_DAYS - days_elapsed;

    let is_overdue = days_elapsed >= FREE_STORAGE_DAYS;
    let is_near_boundary = (0..=ALERT_LOOKAHEAD_DAYS).contains(&days_to_boundary);

    if !(is_overdue || is_near_boundary) {
        return None;
    }

    Some(StorageAlert {
        order_id: order.id,
        order_code: order.code.clone(),
        client_name: order.client_name.clone(),
        arrival_date: arrival,
        arrival_date_display: arrival.format("%Y-%m-%d").to_string(),
        days_elapsed,
        days_remaining: days_to_boundary.max(0),
        months_billable: days_elapsed.div_euclid(FREE_STORAGE_DAYS),
        is_overdue,
    })
}

/// Overdue first (oldest first), then near-boundary (soonest first)
fn by_urgency(a: &StorageAlert, b: &StorageAlert) -> Ordering {
    match (a.is_overdue, b.is_overdue) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => b.days_elapsed.cmp(&a.days_elapsed),
        (false, false) => a.days_remaining.cmp(&b.days_remaining),
    }
}

/// Compute billing alerts for a snapshot of orders, ranked by urgency.
///
/// Ties keep input order.
pub fn compute_storage_alerts(orders: &[Order], now: DateTime<Utc>) -> Vec<StorageAlert> {
    let mut alerts: Vec<StorageAlert> = orders
        .iter()
        .filter_map(|order| evaluate_order(order, now))
        .collect();

    alerts.sort_by(by_urgency);
    alerts
}
