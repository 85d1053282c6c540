//! Error type for xdbc operations.

use std::fmt;

/// Status code an engine reports for a successful call.
pub const STATUS_OK: i32 = 0;

/// Status code used when a statement is issued against a connection that
/// has already released its engine handle.
pub const CONNECTION_CLOSED: i32 = -1;

/// The single structured failure raised by the access layer.
///
/// It carries the statement text that failed, the engine's numeric status
/// code and the engine's message. It never owns an engine resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlError {
    sql: String,
    code: i32,
    message: String,
}

impl SqlError {
    /// Create a new error from a statement, status code and message.
    pub fn new(sql: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            code,
            message: message.into(),
        }
    }

    /// Error for a statement issued after the connection was closed.
    pub fn connection_closed(sql: impl Into<String>) -> Self {
        Self::new(sql, CONNECTION_CLOSED, "connection is closed")
    }

    /// The statement text exactly as it was submitted.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The engine status code (never [`STATUS_OK`]).
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The engine message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQL error {}: {}", self.code, self.message)?;
        if !self.sql.is_empty() {
            write!(f, " (sql: {})", self.sql)?;
        }
        Ok(())
    }
}

impl std::error::Error for SqlError {}

/// Result type alias for xdbc operations.
pub type Result<T, E = SqlError> = std::result::Result<T, E>;
