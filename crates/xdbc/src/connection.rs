//! Owned engine connections.

use crate::context::private::Sealed;
use crate::prepared::PreparedStatement;
use crate::slot::CursorSlot;
use crate::statement::Statement;
use std::fmt;
use xdbc_core::{ConnectionHandle, Engine, EngineResult, Result, SqlError};

/// An open connection to a datasource.
///
/// The connection exclusively owns its engine handle and releases it on
/// [`close`](Connection::close) or drop, whichever comes first. It is also
/// a statement context in its own right: `execute`, `execute_update`,
/// `execute_query` and transaction control are available through
/// [`StatementContext`](crate::StatementContext).
///
/// Statements, prepared statements and cursors borrow the connection, so
/// it cannot be closed while any of them is alive.
pub struct Connection<E: Engine> {
    handle: Option<E::Connection>,
    slot: CursorSlot<E::Result>,
    datasource: String,
}

impl<E: Engine> Connection<E> {
    pub(crate) fn new(handle: E::Connection, datasource: &str) -> Self {
        Self {
            handle: Some(handle),
            slot: CursorSlot::new(),
            datasource: datasource.to_string(),
        }
    }

    /// The datasource this connection was opened with.
    pub fn datasource(&self) -> &str {
        &self.datasource
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Create a statement for ad-hoc SQL against this connection.
    pub fn create_statement(&self) -> Statement<'_, E> {
        Statement::new(self)
    }

    /// Compile `sql` into a reusable prepared statement.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn create_prepared_statement(&self, sql: &str) -> Result<PreparedStatement<'_, E>> {
        let conn = self
            .handle
            .as_ref()
            .ok_or_else(|| SqlError::connection_closed(sql))?;
        let handle = conn.prepare(sql).inspect_err(|e| {
            tracing::debug!(code = e.code(), message = e.message(), "Prepare failed");
        })?;
        Ok(PreparedStatement::new(self, handle, sql))
    }

    /// Release the connection. Later calls do nothing.
    pub fn close(&mut self) {
        self.slot.release();
        if let Some(handle) = self.handle.take() {
            handle.close();
            tracing::debug!(datasource = %self.datasource, "Connection closed");
        }
    }

    pub(crate) fn handle(&self) -> Option<&E::Connection> {
        self.handle.as_ref()
    }
}

impl<E: Engine> Sealed for Connection<E> {
    type Engine = E;

    fn connection_handle(&self) -> Option<&E::Connection> {
        self.handle()
    }

    fn cursor_slot(&self) -> &CursorSlot<EngineResult<E>> {
        &self.slot
    }
}

impl<E: Engine> Drop for Connection<E> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<E: Engine> fmt::Debug for Connection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("datasource", &self.datasource)
            .field("closed", &self.is_closed())
            .finish()
    }
}
