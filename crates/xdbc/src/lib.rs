//! xdbc: a safe access layer over handle-based SQL engines.
//!
//! The layer owns every engine resource it obtains (connections, compiled
//! statements, results) and releases each exactly once. Engine failures
//! surface as [`SqlError`]; results are read through a forward-only
//! [`ResultSet`] addressable by ordinal or column name.
//!
//! # Overview
//!
//! - [`Driver`] opens a datasource into an owned [`Connection`]
//! - [`Connection`], [`Statement`] and [`PreparedStatement`] all run SQL
//!   through [`StatementContext`]
//! - [`PreparedStatement`] adds 1-based positional parameters that persist
//!   across executions
//! - [`ResultSet`] iterates rows and exposes [`ResultSetMetaData`]
//!
//! # Example
//!
//! ```rust,ignore
//! use xdbc::prelude::*;
//!
//! let conn = SqliteDriver::connect(":memory:")?;
//! conn.execute("CREATE TABLE student (id INT PRIMARY KEY, name CHAR(16), age INT)")?;
//! conn.execute_update("INSERT INTO student VALUES (1001, 'jack', 10), (1002, 'tom', 11)")?;
//!
//! let mut rs = conn.execute_query("SELECT * FROM student")?;
//! println!("rows: {}", rs.rows_count());
//! while rs.next() {
//!     println!("{:?} {:?}", rs.get_int("id"), rs.get_string("name"));
//! }
//! ```
//!
//! # Lifetimes
//!
//! Statements, prepared statements and cursors borrow the connection they
//! came from, so a connection cannot be closed or dropped while any of them
//! is alive. None of these types are `Send` or `Sync`.

pub mod connection;
pub mod context;
pub mod driver;
pub mod metadata;
pub mod prepared;
pub mod result_set;
mod slot;
pub mod statement;

pub use connection::Connection;
pub use context::StatementContext;
pub use driver::Driver;
pub use metadata::ResultSetMetaData;
pub use prepared::PreparedStatement;
pub use result_set::{ColumnIndex, ResultSet};
pub use statement::Statement;

pub use xdbc_core::{
    CONNECTION_CLOSED, ColumnDesc, ColumnType, Engine, FromValue, Result, STATUS_OK, SqlError,
    Value,
};

/// The bundled SQLite engine.
#[cfg(feature = "sqlite")]
pub use xdbc_sqlite as sqlite;

/// Driver over the bundled SQLite engine.
#[cfg(feature = "sqlite")]
pub type SqliteDriver = Driver<xdbc_sqlite::SqliteEngine>;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        ColumnType, Connection, Driver, PreparedStatement, Result, ResultSet, ResultSetMetaData,
        SqlError, Statement, StatementContext, Value,
    };

    #[cfg(feature = "sqlite")]
    pub use crate::SqliteDriver;
}
