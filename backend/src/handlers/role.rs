//! Role management handlers (staff only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::role::{CreateRoleInput, Permission, Role, RoleWithPermissions, UpdateRoleInput};
use crate::services::RoleService;
use crate::AppState;

/// List roles
pub async fn list_roles(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Role>>> {
    user.require_admin()?;
    let roles = RoleService::new(state.db).list_roles().await?;
    Ok(Json(roles))
}

/// List grantable permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Permission>>> {
    user.require_admin()?;
    let permissions = RoleService::new(state.db).list_permissions().await?;
    Ok(Json(permissions))
}

/// Get a role with its permissions
pub async fn get_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<Uuid>,
) -> AppResult<Json<RoleWithPermissions>> {
    user.require_admin()?;
    let role = RoleService::new(state.db).get_role(role_id).await?;
    Ok(Json(role))
}

/// Create a role
pub async fn create_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateRoleInput>,
) -> AppResult<(StatusCode, Json<RoleWithPermissions>)> {
    user.require_admin()?;
    let role = RoleService::new(state.db).create_role(input).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// Rename a role or replace its permissions
pub async fn update_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<Uuid>,
    Json(input): Json<UpdateRoleInput>,
) -> AppResult<Json<RoleWithPermissions>> {
    user.require_admin()?;
    let role = RoleService::new(state.db).update_role(role_id, input).await?;
    Ok(Json(role))
}

/// Delete a role
pub async fn delete_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    user.require_admin()?;
    RoleService::new(state.db).delete_role(role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
