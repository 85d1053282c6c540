//! Engine wrapper that counts handle acquisition and release.
//!
//! Delegates to the bundled SQLite engine. Counters are thread-local, and
//! the test harness runs each test on its own thread.

#![allow(dead_code)]

use std::cell::Cell;
use xdbc::sqlite::{SqliteConnection, SqliteEngine, SqliteResult, SqliteStatement};
use xdbc_core::{
    ColumnDesc, ConnectionHandle, Engine, Param, Result, ResultHandle, StatementHandle, Value,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub connections_opened: u32,
    pub connections_closed: u32,
    pub statements_prepared: u32,
    pub statements_closed: u32,
    pub results_opened: u32,
    pub results_freed: u32,
}

impl Counts {
    /// Every acquired handle has been released exactly once.
    pub fn balanced(&self) -> bool {
        self.connections_opened == self.connections_closed
            && self.statements_prepared == self.statements_closed
            && self.results_opened == self.results_freed
    }
}

thread_local! {
    static COUNTS: Cell<Counts> = Cell::new(Counts::default());
}

pub fn counts() -> Counts {
    COUNTS.with(Cell::get)
}

fn bump(f: impl FnOnce(&mut Counts)) {
    COUNTS.with(|cell| {
        let mut counts = cell.get();
        f(&mut counts);
        cell.set(counts);
    });
}

#[derive(Debug, Default, Clone)]
pub struct CountingEngine(SqliteEngine);

impl Engine for CountingEngine {
    type Connection = CountingConnection;
    type Statement = CountingStatement;
    type Result = CountingResult;

    fn open(&self, datasource: &str) -> Result<CountingConnection> {
        let conn = self.0.open(datasource)?;
        bump(|c| c.connections_opened += 1);
        Ok(CountingConnection(conn))
    }
}

#[derive(Debug)]
pub struct CountingConnection(SqliteConnection);

impl ConnectionHandle for CountingConnection {
    type Statement = CountingStatement;
    type Result = CountingResult;

    fn exec(&self, sql: &str) -> CountingResult {
        CountingResult::wrap(self.0.exec(sql))
    }

    fn prepare(&self, sql: &str) -> Result<CountingStatement> {
        let stmt = self.0.prepare(sql)?;
        bump(|c| c.statements_prepared += 1);
        Ok(CountingStatement(stmt))
    }

    fn begin(&self) -> i32 {
        self.0.begin()
    }

    fn commit(&self) -> i32 {
        self.0.commit()
    }

    fn rollback(&self) -> i32 {
        self.0.rollback()
    }

    fn close(self) {
        bump(|c| c.connections_closed += 1);
        self.0.close();
    }
}

#[derive(Debug)]
pub struct CountingStatement(SqliteStatement);

impl StatementHandle for CountingStatement {
    type Result = CountingResult;

    fn exec(&self) -> CountingResult {
        CountingResult::wrap(self.0.exec())
    }

    fn bind(&mut self, param_id: u16, value: Param<'_>) -> i32 {
        self.0.bind(param_id, value)
    }

    fn error_message(&self) -> String {
        self.0.error_message()
    }

    fn clear_bindings(&mut self) {
        self.0.clear_bindings();
    }

    fn close(self) {
        bump(|c| c.statements_closed += 1);
        self.0.close();
    }
}

#[derive(Debug)]
pub struct CountingResult(SqliteResult);

impl CountingResult {
    fn wrap(result: SqliteResult) -> Self {
        bump(|c| c.results_opened += 1);
        Self(result)
    }
}

impl ResultHandle for CountingResult {
    type Row = usize;
    type Meta = std::sync::Arc<[ColumnDesc]>;

    fn status(&self) -> i32 {
        self.0.status()
    }

    fn message(&self) -> &str {
        self.0.message()
    }

    fn column_count(&self) -> u16 {
        self.0.column_count()
    }

    fn row_count(&self) -> u64 {
        self.0.row_count()
    }

    fn affected_rows(&self) -> u64 {
        self.0.affected_rows()
    }

    fn column_meta(&self) -> Self::Meta {
        self.0.column_meta()
    }

    fn fetch_row(&mut self) -> Option<usize> {
        self.0.fetch_row()
    }

    fn value(&self, row: usize, ordinal: u16) -> Option<&Value> {
        self.0.value(row, ordinal)
    }

    fn free(self) {
        bump(|c| c.results_freed += 1);
        self.0.free();
    }
}
