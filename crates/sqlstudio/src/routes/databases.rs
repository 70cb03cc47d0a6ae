//! Database management endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;
use crate::services::databases;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/databases", get(list_databases).post(create_database))
        .route("/databases/:db", delete(drop_database))
        .route("/databases/:db/ddl", get(database_ddl))
}

#[derive(Debug, Serialize)]
struct DatabaseListResponse {
    success: bool,
    databases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CreateDatabaseRequest {
    name: String,
}

async fn list_databases(State(state): State<AppState>) -> Result<Json<DatabaseListResponse>> {
    let databases = databases::list_databases(&state.pool).await?;
    Ok(Json(DatabaseListResponse {
        success: true,
        databases,
    }))
}

async fn create_database(
    State(state): State<AppState>,
    Json(request): Json<CreateDatabaseRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    databases::create_database(&state.pool, &request.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("Database '{}' created successfully", request.name),
        })),
    ))
}

async fn drop_database(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> Result<Json<Value>> {
    databases::drop_database(&state.pool, &db).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Database '{db}' deleted successfully"),
    })))
}

async fn database_ddl(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> Result<Json<Value>> {
    let ddl = databases::database_ddl(&state.pool, &db).await?;
    Ok(Json(json!({
        "success": true,
        "ddl": ddl,
    })))
}
