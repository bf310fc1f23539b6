use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::core::error_classifier::{classify, ErrorClass, Resource, UNMATCHED_PATH_MSG};

/// PostgreSQL SQLSTATE raised when an integer column overflows.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

#[derive(Debug)]
pub enum AppError {
    Database(sqlx::Error),
    NotFound(String),
    Validation(String),
    Constraint(String),
    Internal(String),
    ConfigurationError(String),
}

impl AppError {
    /// Rejection whose text comes from the error classifier.
    pub fn rejection(class: ErrorClass, resource: Resource) -> Self {
        let msg = classify(class, resource);
        match class {
            ErrorClass::NotFound => AppError::NotFound(msg),
            ErrorClass::BadRequest => AppError::Validation(msg),
        }
    }

    pub fn not_found(resource: Resource) -> Self {
        Self::rejection(ErrorClass::NotFound, resource)
    }

    pub fn invalid(resource: Resource) -> Self {
        Self::rejection(ErrorClass::BadRequest, resource)
    }

    pub fn unmatched_path() -> Self {
        AppError::NotFound(UNMATCHED_PATH_MSG.to_string())
    }

    /// Constraint violations and integer overflow become 400 with the resource's
    /// wording; anything else stays a database error.
    pub fn from_write(err: sqlx::Error, resource: Resource) -> Self {
        let violated = err
            .as_database_error()
            .map(|db| {
                matches!(
                    db.kind(),
                    sqlx::error::ErrorKind::UniqueViolation
                        | sqlx::error::ErrorKind::ForeignKeyViolation
                        | sqlx::error::ErrorKind::NotNullViolation
                        | sqlx::error::ErrorKind::CheckViolation
                ) || db.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE)
            })
            .unwrap_or(false);

        if violated {
            tracing::debug!("Constraint violation on {}: {}", resource, err);
            AppError::Constraint(classify(ErrorClass::BadRequest, resource))
        } else {
            AppError::Database(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Constraint(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) | AppError::ConfigurationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message a client sees.
    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::Constraint(msg) => msg,
            AppError::Database(_) | AppError::Internal(_) | AppError::ConfigurationError(_) => {
                "Internal server error"
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Constraint(msg) => write!(f, "Constraint violation: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "msg": self.message(),
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
