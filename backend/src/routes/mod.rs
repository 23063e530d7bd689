//! Route definitions for the Fabric Roll Tracking Platform

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes. The state is needed up front so the auth middleware
/// can verify tokens against the configured JWT secret.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public, except profile)
        .nest("/auth", auth_routes(&state))
        // Protected routes - inventory units and product codes
        .nest("/inventory", inventory_routes(&state))
        // Protected routes - scan staging worklist
        .nest("/scans", scan_routes(&state))
        // Protected routes - dispatch records
        .nest("/dispatches", dispatch_routes(&state))
        // Protected routes - reference-data administration
        .nest("/refdata", refdata_routes(&state))
        // Protected route - all lookup tables in one response
        .route(
            "/master-names",
            get(handlers::get_master_names)
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Authentication routes (public, except profile)
fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route(
            "/me",
            get(handlers::me)
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
}

/// Inventory unit routes (protected)
fn inventory_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/units",
            get(handlers::list_inventory_records).post(handlers::create_unit),
        )
        .route("/units/preview", get(handlers::preview_product_code))
        .route(
            "/units/:unit_id",
            get(handlers::get_unit).put(handlers::update_unit),
        )
        .route("/units/:unit_id/qr", get(handlers::view_qr_code))
        .route("/units/:unit_id/qr/download", get(handlers::download_qr_code))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Scan staging routes (protected)
fn scan_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_scans).post(handlers::record_scan))
        .route("/:product_code", delete(handlers::remove_scan))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Dispatch routes (protected)
fn dispatch_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_dispatches).post(handlers::create_dispatch),
        )
        .route("/:dispatch_id", get(handlers::get_dispatch))
        .route("/:dispatch_id/status", put(handlers::update_dispatch_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Reference-data routes (protected; mutations are admin only)
fn refdata_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/:table",
            get(handlers::list_ref_items).post(handlers::create_ref_item),
        )
        .route(
            "/:table/:item_id",
            get(handlers::get_ref_item)
                .put(handlers::update_ref_item)
                .delete(handlers::delete_ref_item),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}
