//! Staff role management: roles and the permission set granted to each

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validate_role_name;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Names carried in access tokens; custom roles cannot take them
const RESERVED_ROLE_NAMES: [&str; 2] = ["admin", "client"];

/// Role service for managing staff roles
#[derive(Clone)]
pub struct RoleService {
    db: PgPool,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone, sqlx::FromRow)]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Input for creating a role
#[derive(Debug, Deserialize)]
pub struct CreateRoleInput {
    pub name: String,
    #[serde(default)]
    pub permission_ids: Vec<Uuid>,
}

/// Input for updating a role; a given permission list replaces the current one
#[derive(Debug, Deserialize)]
pub struct UpdateRoleInput {
    pub name: Option<String>,
    pub permission_ids: Option<Vec<Uuid>>,
}

/// Role with its permissions
#[derive(Debug, Serialize)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// Trim, lowercase and check a role name
fn normalize_role_name(name: &str) -> AppResult<String> {
    let name = name.trim().to_lowercase();
    validate_role_name(&name).map_err(|m| AppError::invalid("name", m))?;
    if RESERVED_ROLE_NAMES.contains(&name.as_str()) {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "Cannot use reserved role name".to_string(),
            message_es: "No se puede usar un nombre de rol reservado".to_string(),
        });
    }
    Ok(name)
}

/// Drop repeated ids, keeping first occurrences in order
fn dedup_permission_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

impl RoleService {
    /// Create a new RoleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All roles by name
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles ORDER BY name")
            .fetch_all(&self.db)
            .await?;
        Ok(roles)
    }

    /// All grantable permissions
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT id, name, description FROM permissions ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(permissions)
    }

    /// Get a role with its permissions
    pub async fn get_role(&self, role_id: Uuid) -> AppResult<RoleWithPermissions> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Role".to_string()))?;

        let permissions = sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.id, p.name, p.description
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.db)
        .await?;

        Ok(RoleWithPermissions { role, permissions })
    }

    /// Create a role with an initial permission set
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleWithPermissions> {
        let name = normalize_role_name(&input.name)?;
        let permission_ids = dedup_permission_ids(input.permission_ids);
        self.ensure_permissions_exist(&permission_ids).await?;

        let mut tx = self.db.begin().await?;

        let role_id = sqlx::query_scalar::<_, Uuid>("INSERT INTO roles (name) VALUES ($1) RETURNING id")
            .bind(&name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::from_insert(e, "name"))?;

        replace_permissions(&mut tx, role_id, &permission_ids).await?;
        tx.commit().await?;

        tracing::info!(role_id = %role_id, name = %name, "role created");
        self.get_role(role_id).await
    }

    /// Rename a role and/or replace its permissions
    pub async fn update_role(
        &self,
        role_id: Uuid,
        input: UpdateRoleInput,
    ) -> AppResult<RoleWithPermissions> {
        let name = input.name.as_deref().map(normalize_role_name).transpose()?;
        let permission_ids = input.permission_ids.map(dedup_permission_ids);
        if let Some(ids) = &permission_ids {
            self.ensure_permissions_exist(ids).await?;
        }

        let mut tx = self.db.begin().await?;

        let result = sqlx::query("UPDATE roles SET name = COALESCE($2, name) WHERE id = $1")
            .bind(role_id)
            .bind(&name)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_insert(e, "name"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Role".to_string()));
        }

        if let Some(ids) = &permission_ids {
            replace_permissions(&mut tx, role_id, ids).await?;
        }

        tx.commit().await?;
        self.get_role(role_id).await
    }

    /// Delete a role; its permission grants go with it
    pub async fn delete_role(&self, role_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Role".to_string()));
        }

        tracing::info!(role_id = %role_id, "role deleted");
        Ok(())
    }

    async fn ensure_permissions_exist(&self, ids: &[Uuid]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM permissions WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(&self.db)
            .await?;

        if found != ids.len() as i64 {
            return Err(AppError::Validation {
                field: "permission_ids".to_string(),
                message: "One or more permission IDs are invalid".to_string(),
                message_es: "Uno o más permisos no existen".to_string(),
            });
        }
        Ok(())
    }
}

async fn replace_permissions(
    tx: &mut Transaction<'_, Postgres>,
    role_id: Uuid,
    permission_ids: &[Uuid],
) -> AppResult<()> {
    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut **tx)
        .await?;

    for permission_id in permission_ids {
        sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
            .bind(role_id)
            .bind(permission_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
