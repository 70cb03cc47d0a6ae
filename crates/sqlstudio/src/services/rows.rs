//! Row-level CRUD.
//!
//! Column and table names are validated identifiers interpolated
//! back-quoted; every value is a bind parameter, so nothing the client
//! sends is ever spliced into SQL text.

use serde_json::{Map, Value};
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use sqlx::{MySql, MySqlPool};

use super::validate_identifier;
use crate::error::{Result, StudioError};

/// Insert one row. `data` maps column names to values.
pub async fn insert_row(
    pool: &MySqlPool,
    database: &str,
    table: &str,
    data: &Map<String, Value>,
) -> Result<()> {
    validate_identifier(database, "Database name")?;
    validate_identifier(table, "Table name")?;
    validate_row_data(data)?;

    let columns: Vec<&String> = data.keys().collect();
    let column_list = columns
        .iter()
        .map(|c| format!("`{c}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");

    let sql = format!("INSERT INTO `{database}`.`{table}` ({column_list}) VALUES ({placeholders})");

    let mut query = sqlx::query(&sql);
    for column in &columns {
        query = bind_value(query, &data[column.as_str()]);
    }
    query.execute(pool).await?;

    tracing::info!(database, table, "inserted row");
    Ok(())
}

/// Update the row identified by `pk_column = pk_value`. Returns the
/// number of affected rows; zero is not an error, the row may simply be
/// gone already.
pub async fn update_row(
    pool: &MySqlPool,
    database: &str,
    table: &str,
    pk_column: &str,
    pk_value: &Value,
    data: &Map<String, Value>,
) -> Result<u64> {
    validate_identifier(database, "Database name")?;
    validate_identifier(table, "Table name")?;
    validate_identifier(pk_column, "Primary key column name")?;
    validate_row_data(data)?;

    let columns: Vec<&String> = data.keys().collect();
    let set_clause = columns
        .iter()
        .map(|c| format!("`{c}` = ?"))
        .collect::<Vec<_>>()
        .join(", ");

    let sql =
        format!("UPDATE `{database}`.`{table}` SET {set_clause} WHERE `{pk_column}` = ?");

    let mut query = sqlx::query(&sql);
    for column in &columns {
        query = bind_value(query, &data[column.as_str()]);
    }
    query = bind_value(query, pk_value);

    let affected = query.execute(pool).await?.rows_affected();
    if affected == 0 {
        tracing::warn!(database, table, pk_column, "update matched no rows");
    } else {
        tracing::info!(database, table, affected, "updated rows");
    }
    Ok(affected)
}

/// Delete the row identified by `pk_column = pk_value`. Returns the
/// number of affected rows.
pub async fn delete_row(
    pool: &MySqlPool,
    database: &str,
    table: &str,
    pk_column: &str,
    pk_value: &Value,
) -> Result<u64> {
    validate_identifier(database, "Database name")?;
    validate_identifier(table, "Table name")?;
    validate_identifier(pk_column, "Primary key column name")?;

    let sql = format!("DELETE FROM `{database}`.`{table}` WHERE `{pk_column}` = ?");

    let affected = bind_value(sqlx::query(&sql), pk_value)
        .execute(pool)
        .await?
        .rows_affected();
    if affected == 0 {
        tracing::warn!(database, table, pk_column, "delete matched no rows");
    } else {
        tracing::info!(database, table, affected, "deleted rows");
    }
    Ok(affected)
}

fn validate_row_data(data: &Map<String, Value>) -> Result<()> {
    if data.is_empty() {
        return Err(StudioError::InvalidRequest("Data cannot be empty".to_string()));
    }
    for column in data.keys() {
        validate_identifier(column, "Column name")?;
    }
    Ok(())
}

/// Bind a JSON value as the matching MySQL parameter type. Arrays and
/// objects travel as their JSON text, which MySQL will accept for JSON
/// columns and reject with a typed error elsewhere.
fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(u) = n.as_u64() {
                query.bind(u)
            } else {
                query.bind(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn row_data_must_be_non_empty_with_valid_columns() {
        assert!(validate_row_data(&Map::new()).is_err());
        assert!(validate_row_data(&map(json!({"name": "a", "age": 3}))).is_ok());
        assert!(validate_row_data(&map(json!({"bad`col": 1}))).is_err());
        assert!(validate_row_data(&map(json!({"col; drop": 1}))).is_err());
    }
}
