//! MySQL service layer.
//!
//! Thin passthrough to the server: each function validates its inputs,
//! issues one or two statements over the pool, and maps server errors
//! into the console's error taxonomy. Identifiers are validated and
//! back-quoted before interpolation; values always travel as bind
//! parameters.

pub mod databases;
pub mod query;
pub mod rows;
pub mod tables;

use crate::error::{Result, StudioError};

/// System schemas that must not be created or dropped from the console.
pub const SYSTEM_DATABASES: [&str; 4] = [
    "information_schema",
    "mysql",
    "performance_schema",
    "sys",
];

/// MySQL identifiers accepted by the console: `[A-Za-z0-9_]{1,64}`.
///
/// Stricter than the server's own rules, which keeps back-quoted
/// interpolation safe without an escaping pass.
pub fn validate_identifier(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StudioError::InvalidRequest(format!("{what} cannot be empty")));
    }
    if name.len() > 64 || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StudioError::InvalidRequest(format!(
            "{what} must contain only alphanumeric characters and underscores, \
             and be between 1 and 64 characters long"
        )));
    }
    Ok(())
}

/// Refuse create/drop on the server's own schemas.
pub fn refuse_system_database(name: &str) -> Result<()> {
    if SYSTEM_DATABASES.contains(&name.to_ascii_lowercase().as_str()) {
        return Err(StudioError::InvalidRequest(format!(
            "Cannot modify system database: {name}"
        )));
    }
    Ok(())
}

/// Tokens that have no business in a row-browsing WHERE fragment.
const FORBIDDEN_FILTER_TOKENS: [&str; 16] = [
    "DROP",
    "DELETE",
    "INSERT",
    "UPDATE",
    "CREATE",
    "ALTER",
    "TRUNCATE",
    "EXEC",
    "EXECUTE",
    "UNION",
    "--",
    "/*",
    "*/",
    "INFORMATION_SCHEMA",
    "MYSQL",
    "PERFORMANCE_SCHEMA",
];

/// Screen a raw WHERE fragment supplied by the table browser.
///
/// The fragment is interpolated into a SELECT against a validated
/// table, so this is a keyword blocklist rather than a parser: anything
/// that could escalate a read into a write (or probe the server's own
/// schemas) is rejected outright and the server parses the rest.
pub fn screen_filter(filter: &str) -> Result<()> {
    let upper = filter.to_ascii_uppercase();
    for token in FORBIDDEN_FILTER_TOKENS {
        if upper.contains(token) {
            return Err(StudioError::InvalidRequest(format!(
                "Invalid filter condition: contains forbidden keyword '{token}'"
            )));
        }
    }
    Ok(())
}
