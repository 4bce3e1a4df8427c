//! Portal user and role models
//!
//! Accounts live in the hosted auth provider; the portal only reads the
//! role and client binding carried in the access token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Portal roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Warehouse staff with full access
    Admin,
    /// Customer account, restricted to its own orders
    #[default]
    Client,
}

impl UserRole {
    /// Parse a role name as stored by the auth provider
    pub fn from_claim(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "admin" | "administrator" => UserRole::Admin,
            _ => UserRole::Client,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Client => write!(f, "client"),
        }
    }
}

/// Profile of the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
    /// Client the account is bound to, for client users
    pub client_id: Option<Uuid>,
    pub company_name: Option<String>,
}
