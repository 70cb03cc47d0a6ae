//! Row-level CRUD endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::services::rows;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/databases/:db/tables/:table/rows",
        post(insert_row).put(update_row).delete(delete_row),
    )
}

#[derive(Debug, Deserialize)]
struct InsertRowRequest {
    data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct UpdateRowRequest {
    pk_column: String,
    pk_value: Value,
    data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct DeleteRowRequest {
    pk_column: String,
    pk_value: Value,
}

async fn insert_row(
    State(state): State<AppState>,
    Path((db, table)): Path<(String, String)>,
    Json(request): Json<InsertRowRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    rows::insert_row(&state.pool, &db, &table, &request.data).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("Row inserted successfully into table '{db}.{table}'"),
        })),
    ))
}

async fn update_row(
    State(state): State<AppState>,
    Path((db, table)): Path<(String, String)>,
    Json(request): Json<UpdateRowRequest>,
) -> Result<Json<Value>> {
    let affected = rows::update_row(
        &state.pool,
        &db,
        &table,
        &request.pk_column,
        &request.pk_value,
        &request.data,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "affected_rows": affected,
        "message": format!("Row updated successfully in table '{db}.{table}'"),
    })))
}

async fn delete_row(
    State(state): State<AppState>,
    Path((db, table)): Path<(String, String)>,
    Json(request): Json<DeleteRowRequest>,
) -> Result<Json<Value>> {
    let affected = rows::delete_row(
        &state.pool,
        &db,
        &table,
        &request.pk_column,
        &request.pk_value,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "affected_rows": affected,
        "message": format!("Row deleted successfully from table '{db}.{table}'"),
    })))
}
