//! Warehouse models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bonded warehouse (bodega) where goods are stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Warehouse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub location: Option<String>,
}
