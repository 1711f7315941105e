//! Structured error types for board operations.

use serde::Serialize;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (4xx-like)
    ValidationError,

    // Not found errors
    TaskNotFound,
    ColumnNotFound,

    // Internal errors
    DatabaseError,
    InternalError,
}

/// Errors produced by the board store.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Malformed input, rejected before any transaction begins.
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Column not found: {0}")]
    ColumnNotFound(i64),

    /// Transaction conflict, busy timeout, or connection failure.
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] refinery::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BoardError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::TaskNotFound(_) => ErrorCode::TaskNotFound,
            Self::ColumnNotFound(_) => ErrorCode::ColumnNotFound,
            Self::Store(_) | Self::Migration(_) => ErrorCode::DatabaseError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::TaskNotFound(_) | Self::ColumnNotFound(_)
        )
    }

    /// Convert to the wire representation.
    ///
    /// Store and internal failures get a generic message so engine details
    /// never reach clients.
    pub fn to_body(&self) -> ErrorBody {
        let message = if self.is_client_error() {
            match self {
                Self::Validation { message, .. } => message.clone(),
                other => other.to_string(),
            }
        } else {
            "Internal server error".to_string()
        };
        ErrorBody {
            code: self.code(),
            message,
            field: match self {
                Self::Validation { field, .. } => Some(field.to_string()),
                _ => None,
            },
        }
    }
}

/// Structured error body for HTTP responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Result type for board operations.
pub type BoardResult<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_keeps_field() {
        let err = BoardError::invalid("title", "title must not be empty");
        let body = err.to_body();
        assert_eq!(body.code, ErrorCode::ValidationError);
        assert_eq!(body.field.as_deref(), Some("title"));
        assert_eq!(body.message, "title must not be empty");
    }

    #[test]
    fn store_error_hides_details() {
        let err = BoardError::Store(rusqlite::Error::InvalidQuery);
        let body = err.to_body();
        assert_eq!(body.code, ErrorCode::DatabaseError);
        assert_eq!(body.message, "Internal server error");
        assert!(!err.is_client_error());
    }

    #[test]
    fn error_code_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::ColumnNotFound).unwrap();
        assert_eq!(json, "\"COLUMN_NOT_FOUND\"");
    }

    #[test]
    fn not_found_message_names_id() {
        let body = BoardError::TaskNotFound(42).to_body();
        assert_eq!(body.message, "Task not found: 42");
        assert!(body.field.is_none());
    }
}
