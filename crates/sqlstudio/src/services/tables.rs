//! Table-level operations: listing, structure, paged data, drop.

use serde::Serialize;
use sqlx::{MySqlPool, Row};

use super::{screen_filter, validate_identifier};
use crate::error::Result;
use crate::json;

/// One column of a table, as reported by SHOW COLUMNS.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub nullable: bool,
    pub key: String,
    pub default: Option<String>,
    pub extra: String,
}

/// One page of table data plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct TablePage {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<serde_json::Value>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

/// List all tables in a database.
pub async fn list_tables(pool: &MySqlPool, database: &str) -> Result<Vec<String>> {
    validate_identifier(database, "Database name")?;

    let rows = sqlx::query(&format!("SHOW TABLES FROM `{database}`"))
        .fetch_all(pool)
        .await?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
        tables.push(row.try_get::<String, _>(0)?);
    }

    tracing::debug!(database, count = tables.len(), "listed tables");
    Ok(tables)
}

/// Drop a table.
pub async fn drop_table(pool: &MySqlPool, database: &str, table: &str) -> Result<()> {
    validate_identifier(database, "Database name")?;
    validate_identifier(table, "Table name")?;

    sqlx::query(&format!("DROP TABLE `{database}`.`{table}`"))
        .execute(pool)
        .await?;

    tracing::info!(database, table, "dropped table");
    Ok(())
}

/// Column information for a table.
pub async fn table_structure(
    pool: &MySqlPool,
    database: &str,
    table: &str,
) -> Result<Vec<ColumnInfo>> {
    validate_identifier(database, "Database name")?;
    validate_identifier(table, "Table name")?;

    let rows = sqlx::query(&format!("SHOW COLUMNS FROM `{database}`.`{table}`"))
        .fetch_all(pool)
        .await?;

    // SHOW COLUMNS returns: Field, Type, Null, Key, Default, Extra.
    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        columns.push(ColumnInfo {
            name: row.try_get(0)?,
            column_type: row.try_get(1)?,
            nullable: row.try_get::<String, _>(2)? == "YES",
            key: row.try_get(3)?,
            default: row.try_get(4)?,
            extra: row.try_get(5)?,
        });
    }

    Ok(columns)
}

/// One page of rows, optionally restricted by a screened WHERE fragment.
///
/// The total is counted first so the page metadata is truthful; a page
/// past the end comes back empty rather than as an error.
pub async fn table_data(
    pool: &MySqlPool,
    database: &str,
    table: &str,
    filter: Option<&str>,
    page: u64,
    page_size: u64,
) -> Result<TablePage> {
    validate_identifier(database, "Database name")?;
    validate_identifier(table, "Table name")?;

    let where_clause = match filter.map(str::trim) {
        Some(fragment) if !fragment.is_empty() => {
            screen_filter(fragment)?;
            format!(" WHERE {fragment}")
        }
        _ => String::new(),
    };

    let columns = table_structure(pool, database, table).await?;

    let count_sql = format!("SELECT COUNT(*) FROM `{database}`.`{table}`{where_clause}");
    let total: i64 = sqlx::query_scalar(&count_sql).fetch_one(pool).await?;
    let total = total as u64;

    let total_pages = total.div_ceil(page_size);
    let offset = (page - 1) * page_size;

    let select_sql = format!(
        "SELECT * FROM `{database}`.`{table}`{where_clause} LIMIT {page_size} OFFSET {offset}"
    );
    let rows = sqlx::query(&select_sql).fetch_all(pool).await?;

    tracing::debug!(
        database,
        table,
        page,
        total_pages,
        returned = rows.len(),
        "fetched table page"
    );

    Ok(TablePage {
        columns,
        rows: rows.iter().map(json::row_to_json).collect(),
        total,
        page,
        page_size,
        total_pages,
    })
}
