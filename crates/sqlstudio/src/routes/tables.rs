//! Table browsing endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, StudioError};
use crate::services::tables::{self, ColumnInfo, TablePage};
use crate::state::AppState;

/// Largest page the browser may request.
const MAX_PAGE_SIZE: u64 = 1000;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/databases/:db/tables", get(list_tables))
        .route("/databases/:db/tables/:table", delete(drop_table))
        .route("/databases/:db/tables/:table/data", get(table_data))
        .route(
            "/databases/:db/tables/:table/structure",
            get(table_structure),
        )
}

#[derive(Debug, Serialize)]
struct TableListResponse {
    success: bool,
    tables: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TableStructureResponse {
    success: bool,
    columns: Vec<ColumnInfo>,
}

#[derive(Debug, Deserialize)]
struct DataParams {
    filter: Option<String>,
    page: Option<u64>,
    page_size: Option<u64>,
}

async fn list_tables(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> Result<Json<TableListResponse>> {
    let tables = tables::list_tables(&state.pool, &db).await?;
    Ok(Json(TableListResponse {
        success: true,
        tables,
    }))
}

async fn drop_table(
    State(state): State<AppState>,
    Path((db, table)): Path<(String, String)>,
) -> Result<Json<Value>> {
    tables::drop_table(&state.pool, &db, &table).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Table '{table}' deleted successfully from database '{db}'"),
    })))
}

async fn table_structure(
    State(state): State<AppState>,
    Path((db, table)): Path<(String, String)>,
) -> Result<Json<TableStructureResponse>> {
    let columns = tables::table_structure(&state.pool, &db, &table).await?;
    Ok(Json(TableStructureResponse {
        success: true,
        columns,
    }))
}

async fn table_data(
    State(state): State<AppState>,
    Path((db, table)): Path<(String, String)>,
    Query(params): Query<DataParams>,
) -> Result<Json<TablePage>> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(50);

    if page < 1 {
        return Err(StudioError::InvalidRequest(
            "page must be at least 1".to_string(),
        ));
    }
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        return Err(StudioError::InvalidRequest(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    let data = tables::table_data(
        &state.pool,
        &db,
        &table,
        params.filter.as_deref(),
        page,
        page_size,
    )
    .await?;
    Ok(Json(data))
}
