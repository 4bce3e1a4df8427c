//! Client and customs agency registry models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered entity: a client, a customs agency, or both
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    /// Tax identifier (NIT)
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_client: bool,
    pub is_agency: bool,
    pub created_at: DateTime<Utc>,
}

