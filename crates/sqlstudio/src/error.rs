use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Admin key is missing or invalid")]
    Unauthorized,

    #[error("Invalid admin secret, {remaining} attempts remaining")]
    Denied { remaining: u32 },

    #[error("Too many login attempts, retry in {retry_after_secs} seconds")]
    Throttled { retry_after_secs: u64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            StudioError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string())
            }
            StudioError::Denied { .. } => {
                (StatusCode::UNAUTHORIZED, "INVALID_SECRET", self.to_string())
            }
            StudioError::Throttled { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "TOO_MANY_ATTEMPTS",
                self.to_string(),
            ),
            StudioError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", self.to_string())
            }
            StudioError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            StudioError::Database(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "DATABASE_ERROR",
                self.to_string(),
            ),
            StudioError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                self.to_string(),
            ),
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// MySQL server errors that mean the request named something that does
/// not exist.
const MISSING_OBJECT: [u16; 4] = [
    1008, // can't drop database; doesn't exist
    1049, // unknown database
    1051, // unknown table
    1146, // table doesn't exist
];

/// MySQL server errors caused by the request itself: duplicate objects,
/// unknown columns, syntax errors, constraint violations.
const BAD_REQUEST: [u16; 11] = [
    1007, // can't create database; exists
    1050, // table already exists
    1048, // column cannot be null
    1054, // unknown column
    1062, // duplicate entry
    1064, // syntax error
    1264, // out of range value
    1364, // field doesn't have a default value
    1406, // data too long
    1451, // row is referenced by a foreign key
    1452, // foreign key constraint fails (insert/update)
];

impl From<sqlx::Error> for StudioError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StudioError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db) => {
                let number = db
                    .try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
                    .map(sqlx::mysql::MySqlDatabaseError::number);
                match number {
                    Some(n) if MISSING_OBJECT.contains(&n) => {
                        StudioError::NotFound(db.message().to_string())
                    }
                    Some(n) if BAD_REQUEST.contains(&n) => {
                        StudioError::InvalidRequest(db.message().to_string())
                    }
                    _ => StudioError::Database(db.message().to_string()),
                }
            }
            _ => StudioError::Database(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
