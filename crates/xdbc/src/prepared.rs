//! Prepared statements with positional parameters.

use crate::connection::Connection;
use crate::context::check;
use crate::context::private::Sealed;
use crate::result_set::ResultSet;
use crate::slot::CursorSlot;
use std::fmt;
use xdbc_core::{
    Engine, EngineResult, Param, ResultHandle, Result, STATUS_OK, SqlError, StatementHandle,
};

/// A compiled statement that can be run repeatedly.
///
/// The compiled handle is owned for the whole life of the value and is
/// released once, on [`close`](PreparedStatement::close) or drop.
/// Parameters are 1-based and stay bound across executions until
/// [`clear_parameters`](PreparedStatement::clear_parameters).
///
/// The inherent `execute`, `execute_update` and `execute_query` run the
/// compiled statement. The ad-hoc forms from
/// [`StatementContext`](crate::StatementContext) remain reachable with
/// fully qualified syntax.
///
/// # Example
///
/// ```rust,ignore
/// let mut stmt = conn.create_prepared_statement("SELECT name FROM student WHERE id = ?")?;
/// stmt.set_int(1, 1001)?;
/// let mut rs = stmt.execute_query()?;
/// while rs.next() {
///     println!("{:?}", rs.get_string("name"));
/// }
/// ```
pub struct PreparedStatement<'c, E: Engine> {
    conn: &'c Connection<E>,
    handle: Option<E::Statement>,
    sql: String,
    slot: CursorSlot<E::Result>,
}

impl<'c, E: Engine> PreparedStatement<'c, E> {
    pub(crate) fn new(conn: &'c Connection<E>, handle: E::Statement, sql: &str) -> Self {
        tracing::debug!(sql, "Prepared statement");
        Self {
            conn,
            handle: Some(handle),
            sql: sql.to_string(),
            slot: CursorSlot::new(),
        }
    }

    /// The SQL text this statement was compiled from.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The connection this statement was compiled against.
    pub fn connection(&self) -> &'c Connection<E> {
        self.conn
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Run with the current bindings, returning whether columns were produced.
    pub fn execute(&self) -> Result<bool> {
        let result = self.run()?;
        let has_columns = result.column_count() > 0;
        self.slot.hold(result);
        Ok(has_columns)
    }

    /// Run with the current bindings, returning the number of affected rows.
    pub fn execute_update(&self) -> Result<u64> {
        let result = self.run()?;
        let affected = result.affected_rows();
        self.slot.hold(result);
        Ok(affected)
    }

    /// Run with the current bindings, returning a cursor over the rows.
    pub fn execute_query(&self) -> Result<ResultSet<'_, E>> {
        let result = self.run()?;
        Ok(self.slot.issue(result))
    }

    pub fn set_int(&mut self, param_id: u16, value: i32) -> Result<()> {
        self.bind(param_id, Param::Int(value))
    }

    pub fn set_int64(&mut self, param_id: u16, value: i64) -> Result<()> {
        self.bind(param_id, Param::Int64(value))
    }

    pub fn set_double(&mut self, param_id: u16, value: f64) -> Result<()> {
        self.bind(param_id, Param::Double(value))
    }

    pub fn set_string(&mut self, param_id: u16, value: &str) -> Result<()> {
        self.bind(param_id, Param::Text(value))
    }

    /// Reset every parameter to unbound.
    pub fn clear_parameters(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.clear_bindings();
        }
    }

    /// Release the held result and the compiled statement. Later calls do
    /// nothing.
    pub fn close(&mut self) {
        self.slot.release();
        if let Some(handle) = self.handle.take() {
            handle.close();
            tracing::debug!(sql = %self.sql, "Prepared statement closed");
        }
    }

    fn run(&self) -> Result<E::Result> {
        self.slot.release();
        let handle = self.handle.as_ref().ok_or_else(|| self.closed_error())?;
        tracing::trace!(sql = %self.sql, "Executing prepared statement");
        check(&self.sql, handle.exec())
    }

    // Bind failures come from the engine's own range and type checks.
    fn bind(&mut self, param_id: u16, value: Param<'_>) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(self.closed_error());
        };
        let status = handle.bind(param_id, value);
        if status == STATUS_OK {
            return Ok(());
        }
        let message = handle.error_message();
        tracing::debug!(sql = %self.sql, param_id, code = status, %message, "Bind failed");
        Err(SqlError::new(self.sql.clone(), status, message))
    }

    fn closed_error(&self) -> SqlError {
        SqlError::new(
            self.sql.clone(),
            xdbc_core::CONNECTION_CLOSED,
            "prepared statement is closed",
        )
    }
}

impl<E: Engine> Sealed for PreparedStatement<'_, E> {
    type Engine = E;

    fn connection_handle(&self) -> Option<&E::Connection> {
        self.conn.handle()
    }

    fn cursor_slot(&self) -> &CursorSlot<EngineResult<E>> {
        &self.slot
    }
}

impl<E: Engine> Drop for PreparedStatement<'_, E> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<E: Engine> fmt::Debug for PreparedStatement<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("sql", &self.sql)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Connection, StatementContext};
    use xdbc_core::{CONNECTION_CLOSED, Engine};
    use xdbc_sqlite::SqliteEngine;
    use xdbc_sqlite::ffi::SQLITE_RANGE;

    fn open() -> Connection<SqliteEngine> {
        let handle = SqliteEngine::default().open(":memory:").unwrap();
        let conn = Connection::new(handle, ":memory:");
        conn.execute(
            "CREATE TABLE student (id INT PRIMARY KEY, name CHAR(16), score DOUBLE);
             INSERT INTO student VALUES (1001, 'jack', 90.0), (1002, 'tom', 80.5);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_rebinding_changes_result() {
        let conn = open();
        let mut stmt = conn
            .create_prepared_statement("SELECT name FROM student WHERE id = ?")
            .unwrap();

        stmt.set_int(1, 1001).unwrap();
        let mut rs = stmt.execute_query().unwrap();
        assert_eq!(rs.rows_count(), 1);
        assert!(rs.next());
        assert_eq!(rs.get_string("name").as_deref(), Some("jack"));
        drop(rs);

        stmt.set_int64(1, 1002).unwrap();
        let mut rs = stmt.execute_query().unwrap();
        assert!(rs.next());
        assert_eq!(rs.get_string(0_u16).as_deref(), Some("tom"));
        assert!(!rs.next());
    }

    #[test]
    fn test_bindings_persist_until_cleared() {
        let conn = open();
        let mut stmt = conn
            .create_prepared_statement("SELECT id FROM student WHERE name = ?")
            .unwrap();
        stmt.set_string(1, "tom").unwrap();

        for _ in 0..2 {
            let rs = stmt.execute_query().unwrap();
            assert_eq!(rs.rows_count(), 1);
        }

        stmt.clear_parameters();
        let rs = stmt.execute_query().unwrap();
        assert_eq!(rs.rows_count(), 0);
    }

    #[test]
    fn test_prepared_update() {
        let conn = open();
        let mut stmt = conn
            .create_prepared_statement("UPDATE student SET score = ? WHERE id = ?")
            .unwrap();
        stmt.set_double(1, 99.5).unwrap();
        stmt.set_int(2, 1002).unwrap();
        assert_eq!(stmt.execute_update().unwrap(), 1);
        assert_eq!(stmt.update_count(), 1);
        assert!(!stmt.execute().unwrap());

        let mut rs = conn
            .execute_query("SELECT score FROM student WHERE id = 1002")
            .unwrap();
        assert!(rs.next());
        assert_eq!(rs.get_double(0_u16), Some(99.5));
    }

    #[test]
    fn test_bind_out_of_range() {
        let conn = open();
        let mut stmt = conn.create_prepared_statement("SELECT ?").unwrap();
        let err = stmt.set_int(2, 1).unwrap_err();
        assert_eq!(err.code(), SQLITE_RANGE);
        assert_eq!(err.sql(), "SELECT ?");
    }

    #[test]
    fn test_execution_failure() {
        let conn = open();
        let mut stmt = conn
            .create_prepared_statement("INSERT INTO student VALUES (?, 'dup', 0)")
            .unwrap();
        stmt.set_int(1, 1001).unwrap();
        let err = stmt.execute_update().unwrap_err();
        assert_eq!(err.sql(), stmt.sql());
        assert_ne!(err.code(), 0);
    }

    #[test]
    fn test_ad_hoc_sql_through_prepared_context() {
        let conn = open();
        let stmt = conn.create_prepared_statement("SELECT 1").unwrap();
        let deleted = StatementContext::execute_update(&stmt, "DELETE FROM student").unwrap();
        assert_eq!(deleted, 2);
    }

    #[test]
    fn test_close_is_idempotent() {
        let conn = open();
        let mut stmt = conn.create_prepared_statement("SELECT id FROM student").unwrap();
        assert!(stmt.execute().unwrap());

        stmt.close();
        assert!(stmt.is_closed());
        stmt.close();

        let err = stmt.execute_query().unwrap_err();
        assert_eq!(err.code(), CONNECTION_CLOSED);
        let err = stmt.set_int(1, 1).unwrap_err();
        assert_eq!(err.code(), CONNECTION_CLOSED);
        stmt.clear_parameters();
        assert_eq!(stmt.connection().datasource(), ":memory:");
    }
}
