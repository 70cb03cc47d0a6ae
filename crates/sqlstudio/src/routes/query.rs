//! Ad hoc query endpoint.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::Result;
use crate::services::query::{self, QueryOutcome};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/query", post(execute_query))
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    sql: String,
}

async fn execute_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryOutcome>> {
    let outcome = query::run_statement(&state.pool, &request.sql).await?;
    Ok(Json(outcome))
}
