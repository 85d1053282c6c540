//! SQLite engine handles.
//!
//! This module wraps SQLite's C API in the handle contract of
//! `xdbc_core::engine`. Handles are plain pointers with no `Drop`: they
//! are released only through `close(self)`, which the access layer calls
//! exactly once.

// Allow casts in FFI code where we need to match C types exactly
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::borrow_as_ptr)] // FFI requires raw pointers

use crate::config::SqliteConfig;
use crate::ffi;
use crate::result::SqliteResult;
use std::ffi::{CStr, CString, c_char, c_int};
use std::ptr;
use xdbc_core::{
    ConnectionHandle, Engine, Param, Result, ResultHandle, STATUS_OK, SqlError, StatementHandle,
};

/// The SQLite engine.
///
/// Holds only the configuration applied to each connection it opens.
#[derive(Debug, Clone, Default)]
pub struct SqliteEngine {
    config: SqliteConfig,
}

impl SqliteEngine {
    pub fn new(config: SqliteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }
}

impl Engine for SqliteEngine {
    type Connection = SqliteConnection;
    type Statement = SqliteStatement;
    type Result = SqliteResult;

    fn open(&self, datasource: &str) -> Result<SqliteConnection> {
        let c_path = CString::new(datasource).map_err(|_| {
            SqlError::new(
                datasource,
                ffi::SQLITE_MISUSE,
                "Invalid datasource: contains null byte",
            )
        })?;

        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        let flags = self.config.flags.to_sqlite_flags();

        // SAFETY: We pass valid pointers and check the return value
        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &mut db, flags, ptr::null()) };

        if rc != ffi::SQLITE_OK {
            let message = if db.is_null() {
                ffi::error_string(rc).to_string()
            } else {
                // SAFETY: db is a valid (failed) handle that must still be closed
                unsafe {
                    let msg = ffi::last_error(db);
                    ffi::sqlite3_close_v2(db);
                    msg
                }
            };
            tracing::debug!(datasource, code = rc, %message, "Failed to open database");
            return Err(SqlError::new(
                datasource,
                rc,
                format!("Failed to open database: {}", message),
            ));
        }

        if self.config.busy_timeout_ms > 0 {
            let ms = c_int::try_from(self.config.busy_timeout_ms).unwrap_or(c_int::MAX);
            // SAFETY: db is valid
            unsafe {
                ffi::sqlite3_busy_timeout(db, ms);
            }
        }

        tracing::debug!(datasource, "Opened SQLite database");
        Ok(SqliteConnection { db })
    }
}

/// An open SQLite database handle.
#[derive(Debug)]
pub struct SqliteConnection {
    db: *mut ffi::sqlite3,
}

impl SqliteConnection {
    /// Run every statement in `sql`, returning the last statement's result.
    ///
    /// Execution stops at the first failing statement.
    fn exec_all(&self, sql: &str) -> SqliteResult {
        let Ok(c_sql) = CString::new(sql) else {
            return SqliteResult::failure(ffi::SQLITE_MISUSE, "SQL contains null byte");
        };

        let mut rest: *const c_char = c_sql.as_ptr();
        let mut last = SqliteResult::empty();
        loop {
            let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();
            let mut tail: *const c_char = ptr::null();

            // SAFETY: rest points into c_sql, which outlives the loop
            let rc = unsafe { ffi::sqlite3_prepare_v2(self.db, rest, -1, &mut stmt, &mut tail) };
            if rc != ffi::SQLITE_OK {
                // SAFETY: db is valid
                return SqliteResult::failure(rc, unsafe { ffi::last_error(self.db) });
            }
            if stmt.is_null() {
                // Only whitespace or comments remained
                break;
            }

            // SAFETY: stmt was just prepared on db; finalized right after use
            let result = unsafe {
                let result = SqliteResult::collect(self.db, stmt);
                ffi::sqlite3_finalize(stmt);
                result
            };
            if result.status() != STATUS_OK {
                return result;
            }
            last = result;

            // SAFETY: tail is either null or points into c_sql
            if tail.is_null() || unsafe { *tail } == 0 {
                break;
            }
            rest = tail;
        }
        last
    }

    fn control(&self, sql: &str) -> i32 {
        let result = self.exec_all(sql);
        if result.status() != STATUS_OK {
            tracing::debug!(sql, code = result.status(), "Transaction control failed");
        }
        result.status()
    }
}

impl ConnectionHandle for SqliteConnection {
    type Statement = SqliteStatement;
    type Result = SqliteResult;

    fn exec(&self, sql: &str) -> SqliteResult {
        self.exec_all(sql)
    }

    fn prepare(&self, sql: &str) -> Result<SqliteStatement> {
        let c_sql = CString::new(sql)
            .map_err(|_| SqlError::new(sql, ffi::SQLITE_MISUSE, "SQL contains null byte"))?;

        let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();
        let mut tail: *const c_char = ptr::null();

        // SAFETY: All pointers are valid
        let rc = unsafe {
            ffi::sqlite3_prepare_v2(
                self.db,
                c_sql.as_ptr(),
                c_sql.as_bytes().len() as c_int,
                &mut stmt,
                &mut tail,
            )
        };

        if rc != ffi::SQLITE_OK {
            // SAFETY: db is valid
            let (code, message) =
                unsafe { (ffi::sqlite3_errcode(self.db), ffi::last_error(self.db)) };
            return Err(SqlError::new(sql, code, message));
        }
        if stmt.is_null() {
            return Err(SqlError::new(sql, ffi::SQLITE_MISUSE, "SQL contains no statement"));
        }

        // A prepared statement compiles exactly one statement
        // SAFETY: tail is null or points into c_sql
        let rest = if tail.is_null() {
            ""
        } else {
            unsafe { CStr::from_ptr(tail) }.to_str().unwrap_or("")
        };
        if !rest.trim_matches(|c: char| c.is_whitespace() || c == ';').is_empty() {
            // SAFETY: stmt was just prepared and is not handed out
            unsafe {
                ffi::sqlite3_finalize(stmt);
            }
            return Err(SqlError::new(
                sql,
                ffi::SQLITE_MISUSE,
                "prepared SQL must contain a single statement",
            ));
        }

        Ok(SqliteStatement { db: self.db, stmt })
    }

    fn begin(&self) -> i32 {
        self.control("BEGIN")
    }

    fn commit(&self) -> i32 {
        self.control("COMMIT")
    }

    fn rollback(&self) -> i32 {
        self.control("ROLLBACK")
    }

    fn close(self) {
        // close_v2 defers the actual close until outstanding statements are
        // finalized, so a connection never invalidates a live statement.
        // SAFETY: db is valid and this is the only release path
        let rc = unsafe { ffi::sqlite3_close_v2(self.db) };
        tracing::debug!(code = rc, "Closed SQLite database");
    }
}

/// A compiled SQLite statement.
#[derive(Debug)]
pub struct SqliteStatement {
    db: *mut ffi::sqlite3,
    stmt: *mut ffi::sqlite3_stmt,
}

impl StatementHandle for SqliteStatement {
    type Result = SqliteResult;

    fn exec(&self) -> SqliteResult {
        // SAFETY: stmt is valid; reset keeps the current bindings
        unsafe {
            ffi::sqlite3_reset(self.stmt);
            SqliteResult::collect(self.db, self.stmt)
        }
    }

    fn bind(&mut self, param_id: u16, value: Param<'_>) -> i32 {
        let index = c_int::from(param_id);
        // SAFETY: stmt is valid; SQLite checks the index range itself
        unsafe {
            match value {
                Param::Int(v) => ffi::sqlite3_bind_int(self.stmt, index, v),
                Param::Int64(v) => ffi::sqlite3_bind_int64(self.stmt, index, v),
                Param::Double(v) => ffi::sqlite3_bind_double(self.stmt, index, v),
                Param::Text(v) => {
                    let Ok(len) = c_int::try_from(v.len()) else {
                        return ffi::SQLITE_RANGE;
                    };
                    ffi::sqlite3_bind_text(
                        self.stmt,
                        index,
                        v.as_ptr().cast(),
                        len,
                        ffi::SQLITE_TRANSIENT(),
                    )
                }
            }
        }
    }

    fn error_message(&self) -> String {
        // SAFETY: db is valid
        unsafe { ffi::last_error(self.db) }
    }

    fn clear_bindings(&mut self) {
        // SAFETY: stmt is valid
        unsafe {
            ffi::sqlite3_clear_bindings(self.stmt);
        }
    }

    fn close(self) {
        // SAFETY: stmt is valid and this is the only release path
        unsafe {
            ffi::sqlite3_finalize(self.stmt);
        }
        tracing::trace!("Finalized SQLite statement");
    }
}
