//! HTTP handlers for orders and their movements

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{Movement, Order};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::order::{CreateOrderInput, OrderQuery, RecordMovementInput, UpdateOrderInput};
use crate::services::OrderService;
use crate::AppState;

/// List orders visible to the caller
pub async fn list_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let scope = current_user.0.client_scope()?;
    let service = OrderService::new(state.db);
    let orders = service.list_orders(&query, scope).await?;
    Ok(Json(orders))
}

/// Get a single order
pub async fn get_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let scope = current_user.0.client_scope()?;
    let service = OrderService::new(state.db);
    let order = service.get_order(order_id, scope).await?;
    Ok(Json(order))
}

/// Register a new order
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<(StatusCode, Json<Order>)> {
    current_user.0.require_admin()?;
    let service = OrderService::new(state.db);
    let order = service.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Update an order
pub async fn update_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateOrderInput>,
) -> AppResult<Json<Order>> {
    current_user.0.require_admin()?;
    let service = OrderService::new(state.db);
    let order = service.update_order(order_id, input).await?;
    Ok(Json(order))
}

/// Close an order
pub async fn deactivate_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    current_user.0.require_admin()?;
    let service = OrderService::new(state.db);
    let order = service.deactivate_order(order_id).await?;
    Ok(Json(order))
}

/// List movements of an order
pub async fn list_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Vec<Movement>>> {
    let scope = current_user.0.client_scope()?;
    let service = OrderService::new(state.db);
    let movements = service.list_movements(order_id, scope).await?;
    Ok(Json(movements))
}

/// Record an intake or dispatch
pub async fn record_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<RecordMovementInput>,
) -> AppResult<(StatusCode, Json<Movement>)> {
    current_user.0.require_admin()?;
    let service = OrderService::new(state.db);
    let movement = service.record_movement(order_id, input).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}
