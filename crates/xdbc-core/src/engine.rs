//! The boundary between the access layer and a storage engine.
//!
//! An engine is reached only through opaque handles: a connection handle,
//! a compiled statement handle and a result handle. Each handle is
//! released by a method that consumes it (`close(self)` / `free(self)`),
//! so the type system rules out releasing the same handle twice. The
//! access layer in the `xdbc` crate owns handles and guarantees that
//! every handle it obtains is released on exactly one path.
//!
//! Status codes follow the engine's own numbering; [`STATUS_OK`] means
//! success.
//!
//! [`STATUS_OK`]: crate::STATUS_OK

use crate::Result;
use crate::types::ColumnMetadata;
use crate::value::Value;

/// A storage engine reachable through handles.
///
/// The engine value carries engine configuration only. It holds no
/// per-connection state.
pub trait Engine {
    type Connection: ConnectionHandle<Statement = Self::Statement, Result = Self::Result>;
    type Statement: StatementHandle<Result = Self::Result>;
    type Result: ResultHandle;

    /// Open a connection to the instance named by `datasource`.
    ///
    /// The descriptor is interpreted by the engine only.
    fn open(&self, datasource: &str) -> Result<Self::Connection>;
}

/// Handle to an open engine connection.
pub trait ConnectionHandle {
    type Statement;
    type Result;

    /// Run SQL text. Failures are reported through the result's status.
    fn exec(&self, sql: &str) -> Self::Result;

    /// Compile SQL text containing positional placeholders.
    fn prepare(&self, sql: &str) -> Result<Self::Statement>;

    fn begin(&self) -> i32;
    fn commit(&self) -> i32;
    fn rollback(&self) -> i32;

    /// Release the connection.
    fn close(self);
}

/// A value bound to a positional parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param<'a> {
    Int(i32),
    Int64(i64),
    Double(f64),
    Text(&'a str),
}

/// Handle to a compiled statement.
pub trait StatementHandle {
    type Result;

    /// Run the compiled statement with the current bindings.
    fn exec(&self) -> Self::Result;

    /// Bind a value to the 1-based parameter `param_id`, returning a status.
    fn bind(&mut self, param_id: u16, value: Param<'_>) -> i32;

    /// Message describing the most recent failure on this statement.
    fn error_message(&self) -> String;

    /// Reset every parameter to unbound.
    fn clear_bindings(&mut self);

    /// Release the compiled statement.
    fn close(self);
}

/// Handle to the output of one execution.
pub trait ResultHandle {
    /// Position of a fetched row, valid while the result is held.
    type Row: Copy;
    /// Column-metadata reference.
    type Meta: ColumnMetadata + Clone;

    fn status(&self) -> i32;
    fn message(&self) -> &str;
    fn column_count(&self) -> u16;
    fn row_count(&self) -> u64;
    fn affected_rows(&self) -> u64;
    fn column_meta(&self) -> Self::Meta;

    /// Advance to the next row, or `None` when the rows are exhausted.
    fn fetch_row(&mut self) -> Option<Self::Row>;

    /// The cell at `ordinal` of a previously fetched row.
    fn value(&self, row: Self::Row, ordinal: u16) -> Option<&Value>;

    /// Release the result.
    fn free(self);
}

/// Result handle type of an engine.
pub type EngineResult<E> = <E as Engine>::Result;
/// Row position type of an engine.
pub type EngineRow<E> = <<E as Engine>::Result as ResultHandle>::Row;
/// Column-metadata reference type of an engine.
pub type EngineMeta<E> = <<E as Engine>::Result as ResultHandle>::Meta;
