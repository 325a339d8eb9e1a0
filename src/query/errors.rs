//! # Query Errors

use thiserror::Error;

/// Result type for query descriptor operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Broad classification of a [`QueryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input was absent
    NullReference,
    /// An input was present but outside its allowed domain
    InvalidArgument,
    /// Configuration could not be loaded or failed validation
    Configuration,
}

/// Query descriptor errors
///
/// All validation failures are reported before any state is changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("SQL cannot be null")]
    NullSql,

    #[error("SQL cannot be empty")]
    EmptySql,

    #[error("Timeout should be non-negative or -1: {0}")]
    InvalidTimeout(i64),

    #[error("Cursor buffer size should be positive: {0}")]
    InvalidCursorBufferSize(i64),

    #[error("Invalid query configuration: {0}")]
    Config(String),
}

impl QueryError {
    /// Error classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::NullSql => ErrorKind::NullReference,
            QueryError::EmptySql
            | QueryError::InvalidTimeout(_)
            | QueryError::InvalidCursorBufferSize(_) => ErrorKind::InvalidArgument,
            QueryError::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::NullSql => "NULL_SQL",
            QueryError::EmptySql => "EMPTY_SQL",
            QueryError::InvalidTimeout(_) => "INVALID_TIMEOUT",
            QueryError::InvalidCursorBufferSize(_) => "INVALID_CURSOR_BUFFER_SIZE",
            QueryError::Config(_) => "INVALID_CONFIG",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NullReference | ErrorKind::InvalidArgument => 400,
            ErrorKind::Configuration => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(QueryError::NullSql.kind(), ErrorKind::NullReference);
        assert_eq!(QueryError::EmptySql.kind(), ErrorKind::InvalidArgument);
        assert_eq!(QueryError::InvalidTimeout(-2).kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            QueryError::InvalidCursorBufferSize(0).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(QueryError::Config("x".into()).kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            QueryError::InvalidTimeout(-2).to_string(),
            "Timeout should be non-negative or -1: -2"
        );
        assert_eq!(
            QueryError::InvalidCursorBufferSize(-5).to_string(),
            "Cursor buffer size should be positive: -5"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(QueryError::EmptySql.status_code(), 400);
        assert_eq!(QueryError::Config("bad".into()).status_code(), 500);
        assert_eq!(QueryError::NullSql.code(), "NULL_SQL");
    }
}
