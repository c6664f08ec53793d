/// Error Module
///
/// This module defines the error type shared by every pgtables operation.
/// Driver errors are carried through intact so callers can inspect the
/// underlying server message and SQLSTATE.
use thiserror::Error;

/// Error type for pgtables.
///
/// This enum covers every failure a handle operation can report:
/// - Driver and server errors (missing table, constraint violation, bad SQL)
/// - Rejected raw SQL fragments and identifiers
/// - Column/value arity mismatches
/// - Configuration loading for the command-line tool
#[derive(Error, Debug)]
pub enum PgTablesError {
    /// Errors raised by the PostgreSQL client or the server
    #[error("Database error: {0}")]
    Database(#[from] postgres::Error),

    /// Errors raised by other `Connection` implementations
    #[error("Backend error: {0}")]
    Backend(String),

    /// A raw SQL fragment (datatype, flag, option) that cannot be submitted
    #[error("Rejected SQL fragment {fragment:?}: {reason}")]
    Fragment { fragment: String, reason: String },

    /// An identifier that cannot be quoted
    #[error("Invalid identifier: {0:?}")]
    Identifier(String),

    /// Column list and value list lengths disagree
    #[error("Arity mismatch: {columns} columns for {values} values")]
    Arity { columns: usize, values: usize },

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Result to use PgTablesError as the error type.
pub type Result<T> = std::result::Result<T, PgTablesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let backend_err = PgTablesError::Backend("relation does not exist".to_string());
        assert!(backend_err.to_string().contains("Backend error"));

        let fragment_err = PgTablesError::Fragment {
            fragment: "integer; drop table x".to_string(),
            reason: "statement separator".to_string(),
        };
        assert!(fragment_err.to_string().contains("Rejected SQL fragment"));
        assert!(fragment_err.to_string().contains("statement separator"));

        let arity_err = PgTablesError::Arity { columns: 2, values: 3 };
        assert_eq!(arity_err.to_string(), "Arity mismatch: 2 columns for 3 values");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PgTablesError = io_err.into();
        match err {
            PgTablesError::Io(_) => {}
            _ => panic!("Expected IO error"),
        }

        let json_err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let err: PgTablesError = json_err.into();
        match err {
            PgTablesError::Json(_) => {}
            _ => panic!("Expected JSON error"),
        }
    }
}
