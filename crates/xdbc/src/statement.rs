//! Ad-hoc statements.

use crate::connection::Connection;
use crate::context::private::Sealed;
use crate::slot::CursorSlot;
use std::fmt;
use xdbc_core::{Engine, EngineResult};

/// A statement context borrowing a connection.
///
/// Runs ad-hoc SQL through [`StatementContext`](crate::StatementContext).
/// It keeps at most one live result: issuing a new query closes the cursor
/// of the previous one.
pub struct Statement<'c, E: Engine> {
    conn: &'c Connection<E>,
    slot: CursorSlot<E::Result>,
}

impl<'c, E: Engine> Statement<'c, E> {
    pub(crate) fn new(conn: &'c Connection<E>) -> Self {
        Self {
            conn,
            slot: CursorSlot::new(),
        }
    }

    /// The connection this statement runs against.
    pub fn connection(&self) -> &'c Connection<E> {
        self.conn
    }

    /// Release the held result, if any. The statement stays usable.
    pub fn close(&mut self) {
        self.slot.release();
    }
}

impl<E: Engine> Sealed for Statement<'_, E> {
    type Engine = E;

    fn connection_handle(&self) -> Option<&E::Connection> {
        self.conn.handle()
    }

    fn cursor_slot(&self) -> &CursorSlot<EngineResult<E>> {
        &self.slot
    }
}

impl<E: Engine> fmt::Debug for Statement<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("datasource", &self.conn.datasource())
            .field("update_count", &self.slot.update_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Connection, StatementContext};
    use xdbc_core::Engine;
    use xdbc_sqlite::SqliteEngine;

    fn open() -> Connection<SqliteEngine> {
        let handle = SqliteEngine::default().open(":memory:").unwrap();
        let conn = Connection::new(handle, ":memory:");
        conn.execute("CREATE TABLE t (x INT); INSERT INTO t VALUES (1), (2);")
            .unwrap();
        conn
    }

    #[test]
    fn test_second_query_closes_first_cursor() {
        let conn = open();
        let stmt = conn.create_statement();

        let mut first = stmt.execute_query("SELECT x FROM t ORDER BY x").unwrap();
        assert!(first.next());
        assert_eq!(first.get_int(0_u16), Some(1));

        let mut second = stmt.execute_query("SELECT x FROM t ORDER BY x DESC").unwrap();
        assert!(first.is_closed());
        assert!(!first.next());
        assert_eq!(first.get_int(0_u16), None);

        assert!(second.next());
        assert_eq!(second.get_int(0_u16), Some(2));
    }

    #[test]
    fn test_statements_are_independent() {
        let conn = open();
        let a = conn.create_statement();
        let b = conn.create_statement();

        let mut ra = a.execute_query("SELECT x FROM t").unwrap();
        let mut rb = b.execute_query("SELECT x FROM t").unwrap();
        assert!(ra.next());
        assert!(rb.next());
        assert!(!ra.is_closed());
    }

    #[test]
    fn test_update_count_tracks_last_execution() {
        let conn = open();
        let stmt = conn.create_statement();
        assert_eq!(stmt.update_count(), 0);

        stmt.execute_update("UPDATE t SET x = x * 10").unwrap();
        assert_eq!(stmt.update_count(), 2);

        let rs = stmt.execute_query("SELECT x FROM t").unwrap();
        assert_eq!(rs.update_count(), 0);
        assert_eq!(stmt.update_count(), 0);
    }

    #[test]
    fn test_failure_releases_previous_cursor() {
        let conn = open();
        let stmt = conn.create_statement();
        let rs = stmt.execute_query("SELECT x FROM t").unwrap();

        assert!(stmt.execute_query("SELEKT").is_err());
        assert!(rs.is_closed());
    }

    #[test]
    fn test_close_releases_held_result() {
        let conn = open();
        let mut stmt = conn.create_statement();
        assert!(stmt.execute("SELECT x FROM t").unwrap());
        stmt.close();
        stmt.close();

        // Still usable after close
        assert_eq!(stmt.execute_update("DELETE FROM t").unwrap(), 2);
        assert_eq!(stmt.connection().datasource(), ":memory:");
    }

    #[test]
    fn test_transaction_through_statement() {
        let conn = open();
        let stmt = conn.create_statement();
        assert!(stmt.begin());
        stmt.execute_update("DELETE FROM t").unwrap();
        assert!(stmt.rollback());

        let rs = conn.execute_query("SELECT x FROM t").unwrap();
        assert_eq!(rs.rows_count(), 2);
    }
}
