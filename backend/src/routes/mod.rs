//! Route definitions for the Logistics Portal API

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        .merge(protected_routes(state))
}

/// Everything behind a verified access token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::get_profile))
        .route("/storage-alerts", get(handlers::list_storage_alerts))
        .nest("/orders", order_routes())
        .nest("/clients", client_routes())
        .route("/warehouses", get(handlers::list_warehouses))
        .nest("/inventory", inventory_routes())
        .nest("/roles", role_routes())
        .nest("/settings", setting_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Order and movement routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/:order_id",
            get(handlers::get_order).put(handlers::update_order),
        )
        .route("/:order_id/deactivate", post(handlers::deactivate_order))
        .route(
            "/:order_id/movements",
            get(handlers::list_movements).post(handlers::record_movement),
        )
}

/// Client registry routes (staff only)
fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_clients).post(handlers::create_client))
        .route(
            "/:client_id",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
}

/// Warehouse stock routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_inventory))
        .route("/summary", get(handlers::get_inventory_summary))
}

/// Role and permission management routes (staff only)
fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_roles).post(handlers::create_role))
        .route("/permissions", get(handlers::list_permissions))
        .route(
            "/:role_id",
            get(handlers::get_role)
                .put(handlers::update_role)
                .delete(handlers::delete_role),
        )
}

/// Application settings routes (staff only)
fn setting_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_settings))
        .route("/:key", put(handlers::update_setting))
}
