//! SQLStudio - Web-based MySQL management
//!
//! This crate provides a browser-facing administrative console for a
//! MySQL server:
//! - Database and table browsing with schema inspection
//! - Paged, filterable row data with row-level CRUD
//! - Ad hoc SQL execution
//! - A shared-secret login gate with per-IP throttling and an
//!   append-only audit trail (see `sqlstudio-auth`)

pub mod config;
pub mod error;
pub mod json;
pub mod net;
pub mod routes;
pub mod services;
pub mod state;

use axum::{middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::routes::auth::require_admin_key;
use crate::state::AppState;

/// Create the axum router with all routes.
///
/// Everything except `POST /login` sits behind the admin-key
/// middleware: a missing or invalid `X-Admin-Key` is rejected before
/// any handler or database call runs.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .merge(routes::health::routes())
        .merge(routes::databases::routes())
        .merge(routes::tables::routes())
        .merge(routes::rows::routes())
        .merge(routes::query::routes())
        .merge(routes::auth::protected_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_key,
        ));

    Router::new()
        .merge(routes::auth::routes())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
