//! Client registry service (clients and customs agencies)

use serde::Deserialize;
use shared::{validate_client_flags, validate_email, Client};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Client service for the entity registry
#[derive(Clone)]
pub struct ClientService {
    db: PgPool,
}

/// Query parameters for listing entities
#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    pub search: Option<String>,
    /// Restrict to clients (`true`) or agencies (`false`)
    pub clients_only: Option<bool>,
}

/// Input for registering or updating an entity
#[derive(Debug, Deserialize, Validate)]
pub struct ClientInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 32))]
    pub tax_id: Option<String>,
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub is_client: bool,
    pub is_agency: bool,
}

#[derive(Debug, FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    tax_id: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    is_client: bool,
    is_agency: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            tax_id: row.tax_id,
            email: row.email,
            phone: row.phone,
            is_client: row.is_client,
            is_agency: row.is_agency,
            created_at: row.created_at,
        }
    }
}

impl ClientInput {
    fn check(&self) -> AppResult<()> {
        self.validate()?;
        validate_client_flags(self.is_client, self.is_agency)
            .map_err(|m| AppError::invalid("is_client", m))?;
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            validate_email(email).map_err(|m| AppError::invalid("email", m))?;
        }
        Ok(())
    }
}

const CLIENT_COLUMNS: &str = "id, name, tax_id, email, phone, is_client, is_agency, created_at";

impl ClientService {
    /// Create a new ClientService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List entities ordered by name
    pub async fn list_clients(&self, query: &ClientQuery) -> AppResult<Vec<Client>> {
        let pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let rows = sqlx::query_as::<_, ClientRow>(&format!(
            r#"
            SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE ($1::text IS NULL OR name ILIKE $1 OR tax_id ILIKE $1)
              AND ($2::bool IS NULL OR ($2 AND is_client) OR (NOT $2 AND is_agency))
            ORDER BY name
            "#
        ))
        .bind(pattern)
        .bind(query.clients_only)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Client::from).collect())
    }

    /// Get a single entity
    pub async fn get_client(&self, client_id: Uuid) -> AppResult<Client> {
        sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(client_id)
        .fetch_optional(&self.db)
        .await?
        .map(Client::from)
        .ok_or_else(|| AppError::NotFound("Client".to_string()))
    }

    /// Register an entity
    pub async fn create_client(&self, input: ClientInput) -> AppResult<Client> {
        input.check()?;

        let row = sqlx::query_as::<_, ClientRow>(&format!(
            r#"
            INSERT INTO clients (name, tax_id, email, phone, is_client, is_agency)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.tax_id)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.is_client)
        .bind(input.is_agency)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(client_id = %row.id, "entity registered");
        Ok(row.into())
    }

    /// Replace an entity's fields
    pub async fn update_client(&self, client_id: Uuid, input: ClientInput) -> AppResult<Client> {
        input.check()?;

        sqlx::query_as::<_, ClientRow>(&format!(
            r#"
            UPDATE clients
            SET name = $2, tax_id = $3, email = $4, phone = $5, is_client = $6, is_agency = $7
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(input.name.trim())
        .bind(&input.tax_id)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.is_client)
        .bind(input.is_agency)
        .fetch_optional(&self.db)
        .await?
        .map(Client::from)
        .ok_or_else(|| AppError::NotFound("Client".to_string()))
    }

    /// Delete an entity that no order references
    pub async fn delete_client(&self, client_id: Uuid) -> AppResult<()> {
        let in_use = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE client_id = $1)",
        )
        .bind(client_id)
        .fetch_one(&self.db)
        .await?;

        if in_use {
            return Err(AppError::InvalidStateTransition(
                "Client has registered orders".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Client".to_string()));
        }

        Ok(())
    }
}
