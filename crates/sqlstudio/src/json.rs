//! JSON conversion for MySQL rows.
//!
//! Ad hoc queries and table browsing return arbitrary result sets, so
//! rows are decoded by column type name into JSON-friendly values:
//! integers stay numbers, DECIMAL becomes a string (JSON numbers cannot
//! hold its precision), temporal types are formatted, and binary data
//! degrades to lossy UTF-8.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::types::BigDecimal;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Convert a row to a JSON object keyed by column name.
pub fn row_to_json(row: &MySqlRow) -> Value {
    let mut object = serde_json::Map::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = column_value(row, index, column.type_info().name());
        object.insert(column.name().to_string(), value);
    }
    Value::Object(object)
}

/// Column names of a result set, in select order.
pub fn column_names(row: &MySqlRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

fn column_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(_) => {}
        Err(_) => return Value::Null,
    }

    match type_name {
        "BOOLEAN" => row.try_get::<bool, _>(index).map(Value::from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            row.try_get::<i64, _>(index).map(Value::from)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "BIT" => row.try_get::<u64, _>(index).map(Value::from),
        "FLOAT" => row.try_get::<f32, _>(index).map(|f| Value::from(f64::from(f))),
        "DOUBLE" => row.try_get::<f64, _>(index).map(Value::from),
        "DECIMAL" => row
            .try_get::<BigDecimal, _>(index)
            .map(|d| Value::String(d.to_string())),
        "DATE" => row
            .try_get::<NaiveDate, _>(index)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        "DATETIME" => row
            .try_get::<NaiveDateTime, _>(index)
            .map(|d| Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string())),
        "TIMESTAMP" => row
            .try_get::<DateTime<Utc>, _>(index)
            .map(|d| Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string())),
        "TIME" => row
            .try_get::<NaiveTime, _>(index)
            .map(|t| Value::String(t.format("%H:%M:%S").to_string())),
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            row.try_get::<String, _>(index).map(Value::String)
        }
        "JSON" => row.try_get::<Value, _>(index),
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "GEOMETRY" => {
            row.try_get::<Vec<u8>, _>(index)
                .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        }
        _ => row
            .try_get::<String, _>(index)
            .map(Value::String)
            .or_else(|_| {
                row.try_get::<Vec<u8>, _>(index)
                    .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            }),
    }
    .unwrap_or(Value::Null)
}
