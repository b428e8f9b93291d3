use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::services::validator::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Storage fault: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AppError {
    /// Stable tag sent to clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MalformedInput(_) => "MalformedInput",
            AppError::InvalidRange(_) => "InvalidRange",
            AppError::CapacityExceeded(_) => "CapacityExceeded",
            AppError::Conflict(_) => "Conflict",
            AppError::NotFound(_) => "NotFound",
            AppError::Storage(_) => "StorageFault",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedInput(_)
            | AppError::InvalidRange(_)
            | AppError::CapacityExceeded(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Turns storage-level constraint violations into domain errors.
    pub fn from_db(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let code = db_err.code().unwrap_or_default();

            // 2067 / 1555 = SQLite unique / primary key constraint
            // 23505 = PostgreSQL unique violation
            if code == "2067" || code == "1555" || code == "23505" {
                return AppError::Conflict("Resource already exists (duplicate entry)".into());
            }

            // 787 = SQLite foreign key, 23503 = PostgreSQL foreign key
            if code == "787" || code == "23503" {
                return AppError::NotFound("Slot not found".into());
            }
        }
        AppError::Storage(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedInput(rejection.body_text())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        match err {
            ValidationError::MalformedTime(_)
            | ValidationError::MalformedDate(_)
            | ValidationError::WeekdayMismatch { .. } => AppError::MalformedInput(message),
            ValidationError::EndNotAfterStart
            | ValidationError::DurationOutOfBounds { .. }
            | ValidationError::DayOutOfRange(_) => AppError::InvalidRange(message),
            ValidationError::CapacityExceeded { .. } => AppError::CapacityExceeded(message),
            ValidationError::Overlap { .. } => AppError::Conflict(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Storage(e) => {
                error!("Storage error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::MalformedInput(msg)
            | AppError::InvalidRange(msg)
            | AppError::CapacityExceeded(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg) => msg.clone(),
        };

        let body = Json(json!({
            "error": message,
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

/// Failures that stop the service from booting.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
