//! HTTP handlers for the client registry

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::Client;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::client::{ClientInput, ClientQuery};
use crate::services::ClientService;
use crate::AppState;

/// List registered entities
pub async fn list_clients(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ClientQuery>,
) -> AppResult<Json<Vec<Client>>> {
    current_user.0.require_admin()?;
    let service = ClientService::new(state.db);
    let clients = service.list_clients(&query).await?;
    Ok(Json(clients))
}

/// Register an entity
pub async fn create_client(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ClientInput>,
) -> AppResult<(StatusCode, Json<Client>)> {
    current_user.0.require_admin()?;
    let service = ClientService::new(state.db);
    let client = service.create_client(input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// Update an entity
pub async fn update_client(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(client_id): Path<Uuid>,
    Json(input): Json<ClientInput>,
) -> AppResult<Json<Client>> {
    current_user.0.require_admin()?;
    let service = ClientService::new(state.db);
    let client = service.update_client(client_id, input).await?;
    Ok(Json(client))
}

/// Delete an entity
pub async fn delete_client(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    current_user.0.require_admin()?;
    let service = ClientService::new(state.db);
    service.delete_client(client_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a single entity
pub async fn get_client(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Client>> {
    current_user.0.require_admin()?;
    let service = ClientService::new(state.db);
    let client = service.get_client(client_id).await?;
    Ok(Json(client))
}
