//! Database-level operations.

use sqlx::{MySqlPool, Row};

use super::{refuse_system_database, validate_identifier};
use crate::error::Result;

/// List all databases on the server.
pub async fn list_databases(pool: &MySqlPool) -> Result<Vec<String>> {
    let rows = sqlx::query("SHOW DATABASES").fetch_all(pool).await?;

    let mut databases = Vec::with_capacity(rows.len());
    for row in &rows {
        databases.push(row.try_get::<String, _>(0)?);
    }

    tracing::debug!(count = databases.len(), "listed databases");
    Ok(databases)
}

/// Create a new database.
pub async fn create_database(pool: &MySqlPool, name: &str) -> Result<()> {
    validate_identifier(name, "Database name")?;
    refuse_system_database(name)?;

    sqlx::query(&format!("CREATE DATABASE `{name}`"))
        .execute(pool)
        .await?;

    tracing::info!(database = name, "created database");
    Ok(())
}

/// Drop a database.
pub async fn drop_database(pool: &MySqlPool, name: &str) -> Result<()> {
    validate_identifier(name, "Database name")?;
    refuse_system_database(name)?;

    sqlx::query(&format!("DROP DATABASE `{name}`"))
        .execute(pool)
        .await?;

    tracing::info!(database = name, "dropped database");
    Ok(())
}

/// Assemble a DDL script for a database: a CREATE DATABASE header plus
/// the server's own CREATE TABLE statement for every table.
pub async fn database_ddl(pool: &MySqlPool, name: &str) -> Result<String> {
    validate_identifier(name, "Database name")?;

    let tables = super::tables::list_tables(pool, name).await?;

    let mut ddl = String::new();
    ddl.push_str(&format!("-- Database: {name}\n"));
    ddl.push_str(&format!("CREATE DATABASE IF NOT EXISTS `{name}`;\n"));
    ddl.push_str(&format!("USE `{name}`;\n\n"));

    for table in &tables {
        let row = sqlx::query(&format!("SHOW CREATE TABLE `{name}`.`{table}`"))
            .fetch_one(pool)
            .await?;
        // SHOW CREATE TABLE returns (Table, Create Table).
        let create: String = row.try_get(1)?;
        ddl.push_str(&format!("-- Table: {table}\n{create};\n\n"));
    }

    tracing::debug!(database = name, tables = tables.len(), "assembled ddl");
    Ok(ddl)
}
