//! SQLite engine for the xdbc access layer.
//!
// FFI bindings require unsafe code - this is expected for database engines
#![allow(unsafe_code)]
//!
//! This crate implements the handle contract from `xdbc_core::engine` on
//! top of libsqlite3. Results are materialized when a statement runs, so
//! the row count is known before the first fetch.
//!
//! # Example
//!
//! ```rust,ignore
//! use xdbc_core::{ConnectionHandle, Engine, ResultHandle};
//! use xdbc_sqlite::SqliteEngine;
//!
//! let conn = SqliteEngine::default().open(":memory:")?;
//! let res = conn.exec("CREATE TABLE student (id INT PRIMARY KEY, name CHAR(16))");
//! assert_eq!(res.status(), 0);
//! res.free();
//! conn.close();
//! ```
//!
//! # Type Mapping
//!
//! | SQLite storage class | Cell |
//! |----------------------|------|
//! | INTEGER | `Value::Integer` |
//! | REAL | `Value::Double` |
//! | TEXT | `Value::Text` |
//! | BLOB | `Value::Bytes` |
//! | NULL | `Value::Null` |
//!
//! Column type tags come from the declared column type; see
//! [`types::column_type_from_decl`].

pub mod config;
pub mod engine;
pub mod ffi;
pub mod result;
pub mod types;

pub use config::{OpenFlags, SqliteConfig};
pub use engine::{SqliteConnection, SqliteEngine, SqliteStatement};
pub use result::SqliteResult;

/// Re-export the SQLite library version.
pub fn sqlite_version() -> &'static str {
    ffi::version()
}

/// Re-export the SQLite library version number.
pub fn sqlite_version_number() -> i32 {
    ffi::version_number()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_version() {
        let version = sqlite_version();
        assert!(
            version.starts_with('3'),
            "Expected SQLite 3.x, got {}",
            version
        );
    }

    #[test]
    fn test_sqlite_version_number() {
        let num = sqlite_version_number();
        assert!(
            num >= 3_000_000,
            "Expected SQLite 3.x.x (>= 3000000), got {}",
            num
        );
    }
}
