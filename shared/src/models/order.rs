//! Logistics order (D.O.) and warehouse movement models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A logistics order tracking one inbound shipment lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// Human-readable D.O. code (e.g., "DO-2024-0153")
    pub code: String,
    pub client_id: Option<Uuid>,
    /// Owning customer, resolved by the data-access layer
    pub client_name: String,
    /// Customs agency handling the lot
    #[serde(default)]
    pub agency_id: Option<Uuid>,
    #[serde(default)]
    pub agency_name: Option<String>,
    pub product: Option<String>,
    pub bl_number: Option<String>,
    #[serde(default)]
    pub checkpoints: OrderCheckpoints,
    /// An order stays active until it is closed by staff
    pub is_active: bool,
    /// Movement history, in no particular order
    #[serde(default)]
    pub movements: Vec<Movement>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Movements of the given kind, in stored order
    pub fn movements_of(&self, kind: MovementKind) -> impl Iterator<Item = &Movement> {
        self.movements.iter().filter(move |m| m.kind == kind)
    }
}

/// Paperwork milestones of a D.O., filled in by staff as the lot moves
/// through customs and the free zone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderCheckpoints {
    /// Intake form number
    pub intake_form: Option<String>,
    /// Bill of lading release reference or date
    pub bl_release: Option<String>,
    /// Transfer into the free zone
    pub free_zone_transfer: Option<String>,
    /// Exit form number
    pub exit_form: Option<String>,
    /// Date storage was last invoiced
    pub storage_billing_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl OrderCheckpoints {
    /// Overlay the fields set in `changes`; unset fields keep their value
    pub fn merge(&mut self, changes: OrderCheckpoints) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.intake_form, changes.intake_form);
        take(&mut self.bl_release, changes.bl_release);
        take(&mut self.free_zone_transfer, changes.free_zone_transfer);
        take(&mut self.exit_form, changes.exit_form);
        take(&mut self.storage_billing_date, changes.storage_billing_date);
        take(&mut self.notes, changes.notes);
    }
}

/// A physical event against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub order_id: Uuid,
    pub kind: MovementKind,
    pub occurred_at: DateTime<Utc>,
    pub packages: i32,
    pub gross_weight_kg: Decimal,
    pub warehouse_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Kind of warehouse movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods arriving into storage
    Intake,
    /// Goods leaving storage
    Dispatch,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Intake => "intake",
            MovementKind::Dispatch => "dispatch",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementKind::Intake => write!(f, "Intake"),
            MovementKind::Dispatch => write!(f, "Dispatch"),
        }
    }
}

/// Returned when a stored movement kind is not recognised
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown movement kind: {0}")]
pub struct ParseMovementKindError(pub String);

impl std::str::FromStr for MovementKind {
    type Err = ParseMovementKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intake" | "ingreso" => Ok(MovementKind::Intake),
            "dispatch" | "salida" => Ok(MovementKind::Dispatch),
            other => Err(ParseMovementKindError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn movement(kind: MovementKind, packages: i32) -> Movement {
        Movement {
            id: Uuid::new_v4(),
            order_id: Uuid::nil(),
            kind,
            occurred_at: Utc::now(),
            packages,
            gross_weight_kg: Decimal::ZERO,
            warehouse_id: None,
            notes: None,
        }
    }

    #[test]
    fn test_movement_kind_from_str() {
        assert_eq!(MovementKind::from_str("intake"), Ok(MovementKind::Intake));
        assert_eq!(MovementKind::from_str(" Dispatch "), Ok(MovementKind::Dispatch));
        assert_eq!(MovementKind::from_str("salida"), Ok(MovementKind::Dispatch));
        assert!(MovementKind::from_str("transfer").is_err());
    }

    #[test]
    fn test_movement_kind_serde() {
        let json = serde_json::to_string(&MovementKind::Dispatch).unwrap();
        assert_eq!(json, "\"dispatch\"");
        assert_eq!(MovementKind::Intake.as_str(), "intake");
    }

    #[test]
    fn test_movements_of_kind() {
        let order = Order {
            id: Uuid::nil(),
            code: "DO-1".to_string(),
            client_id: None,
            client_name: "Importaciones SAS".to_string(),
            agency_id: None,
            agency_name: None,
            product: None,
            bl_number: None,
            checkpoints: OrderCheckpoints::default(),
            is_active: true,
            movements: vec![
                movement(MovementKind::Intake, 40),
                movement(MovementKind::Intake, 10),
                movement(MovementKind::Dispatch, 15),
            ],
            created_at: Utc::now(),
        };

        assert_eq!(order.movements_of(MovementKind::Intake).count(), 2);
        assert_eq!(order.movements_of(MovementKind::Dispatch).count(), 1);
    }

    #[test]
    fn test_checkpoints_merge_keeps_unset_fields() {
        let mut current = OrderCheckpoints {
            intake_form: Some("FI-1001".to_string()),
            notes: Some("Pallets wrapped".to_string()),
            ..Default::default()
        };

        current.merge(OrderCheckpoints {
            exit_form: Some("FS-2002".to_string()),
            storage_billing_date: NaiveDate::from_ymd_opt(2024, 5, 31),
            ..Default::default()
        });

        assert_eq!(current.intake_form.as_deref(), Some("FI-1001"));
        assert_eq!(current.exit_form.as_deref(), Some("FS-2002"));
        assert_eq!(current.notes.as_deref(), Some("Pallets wrapped"));
        assert_eq!(current.storage_billing_date, NaiveDate::from_ymd_opt(2024, 5, 31));
    }

    #[test]
    fn test_order_json_without_checkpoints() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "code": "DO-9",
            "client_id": null,
            "client_name": "Andina",
            "product": null,
            "bl_number": null,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.checkpoints, OrderCheckpoints::default());
        assert!(order.agency_id.is_none());
        assert!(order.movements.is_empty());
    }
}
