//! The execute/query capability shared by connections and statements.

use crate::result_set::ResultSet;
use crate::slot::CursorSlot;
use xdbc_core::{
    ConnectionHandle, Engine, EngineResult, ResultHandle, Result, STATUS_OK, SqlError,
};

pub(crate) mod private {
    use super::CursorSlot;
    use xdbc_core::{Engine, EngineResult};

    pub trait Sealed {
        type Engine: Engine;

        /// The engine connection this context runs against, if still open.
        fn connection_handle(&self) -> Option<&<Self::Engine as Engine>::Connection>;

        /// The slot holding this context's live result.
        fn cursor_slot(&self) -> &CursorSlot<EngineResult<Self::Engine>>;
    }
}

/// Something SQL text can be executed against.
///
/// Implemented by [`Connection`](crate::Connection),
/// [`Statement`](crate::Statement) and
/// [`PreparedStatement`](crate::PreparedStatement). Each context keeps at
/// most one live result: a new execution releases the previous one, and a
/// cursor obtained earlier from the same context reads as closed afterwards.
///
/// Failed executions return [`SqlError`] carrying the submitted text, the
/// engine status and its message. The engine result of a failed execution
/// is released before the error is returned.
pub trait StatementContext: private::Sealed {
    /// Run `sql`, returning whether it produced columns.
    fn execute(&self, sql: &str) -> Result<bool> {
        let result = run(self, sql)?;
        let has_columns = result.column_count() > 0;
        self.cursor_slot().hold(result);
        Ok(has_columns)
    }

    /// Run `sql`, returning the number of affected rows.
    fn execute_update(&self, sql: &str) -> Result<u64> {
        let result = run(self, sql)?;
        let affected = result.affected_rows();
        self.cursor_slot().hold(result);
        Ok(affected)
    }

    /// Run `sql`, returning a cursor over its rows.
    fn execute_query(&self, sql: &str) -> Result<ResultSet<'_, Self::Engine>> {
        let result = run(self, sql)?;
        Ok(self.cursor_slot().issue(result))
    }

    /// Affected-row count of the last execution through this context.
    fn update_count(&self) -> u64 {
        self.cursor_slot().update_count()
    }

    /// Always `false`: one execution yields at most one result.
    fn more_results(&self) -> bool {
        false
    }

    fn begin(&self) -> bool {
        control(self, "begin", |conn| conn.begin())
    }

    fn commit(&self) -> bool {
        control(self, "commit", |conn| conn.commit())
    }

    fn rollback(&self) -> bool {
        control(self, "rollback", |conn| conn.rollback())
    }
}

impl<T: private::Sealed + ?Sized> StatementContext for T {}

fn run<C>(ctx: &C, sql: &str) -> Result<EngineResult<C::Engine>>
where
    C: private::Sealed + ?Sized,
{
    ctx.cursor_slot().release();
    let conn = ctx
        .connection_handle()
        .ok_or_else(|| SqlError::connection_closed(sql))?;

    tracing::trace!(sql, "Executing");
    let result = conn.exec(sql);
    check(sql, result)
}

/// Turn a failed engine result into an error, releasing the result.
pub(crate) fn check<R: ResultHandle>(sql: &str, result: R) -> Result<R> {
    let status = result.status();
    if status == STATUS_OK {
        return Ok(result);
    }
    let message = result.message().to_string();
    result.free();
    tracing::debug!(sql, code = status, %message, "Statement failed");
    Err(SqlError::new(sql, status, message))
}

fn control<C, F>(ctx: &C, op: &str, f: F) -> bool
where
    C: private::Sealed + ?Sized,
    F: FnOnce(&<C::Engine as Engine>::Connection) -> i32,
{
    let Some(conn) = ctx.connection_handle() else {
        return false;
    };
    let status = f(conn);
    tracing::debug!(op, code = status, "Transaction control");
    status == STATUS_OK
}
