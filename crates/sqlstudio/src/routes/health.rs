use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    Json(json!({
        "status": if database_connected { "healthy" } else { "degraded" },
        "service": "sqlstudio",
        "version": env!("CARGO_PKG_VERSION"),
        "database_connected": database_connected,
    }))
}
