//! Error types for pgfluent

use crate::builder::{Operation, StatementKind};
use thiserror::Error;

/// Result type alias for pgfluent operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum QbError {
    /// The builder state cannot form a statement
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// A clause template and its arguments disagree on the parameter count
    #[error("Placeholder mismatch in '{template}': {markers} marker(s), {args} argument(s)")]
    PlaceholderMismatch {
        template: String,
        markers: usize,
        args: usize,
    },

    /// State recorded by an operation the statement kind does not accept
    #[error("Operation {operation} is not valid for a {kind} statement")]
    IncompatibleOperation {
        operation: Operation,
        kind: StatementKind,
    },

    /// Invalid input to a builder helper
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),
}

impl QbError {
    /// Create a malformed query error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedQuery(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this error was raised while rendering a statement
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedQuery(_)
                | Self::PlaceholderMismatch { .. }
                | Self::IncompatibleOperation { .. }
        )
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Parse a tokio_postgres error into a more specific QbError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

impl From<toml::de::Error> for QbError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
