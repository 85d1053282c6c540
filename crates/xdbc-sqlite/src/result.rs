//! Materialized SQLite results.

use crate::ffi;
use crate::types;
use std::sync::Arc;
use xdbc_core::{ColumnDesc, ColumnType, ResultHandle, STATUS_OK, Value};

/// Result of one execution.
///
/// Rows are fetched from SQLite eagerly when the statement runs, so the
/// row count is known up front and the result stays valid independently
/// of the statement that produced it.
#[derive(Debug)]
pub struct SqliteResult {
    status: i32,
    message: String,
    columns: Arc<[ColumnDesc]>,
    rows: Vec<Vec<Value>>,
    affected_rows: u64,
    cursor: usize,
}

impl SqliteResult {
    /// A successful result with no columns and no rows.
    pub(crate) fn empty() -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            columns: Arc::from(Vec::new()),
            rows: Vec::new(),
            affected_rows: 0,
            cursor: 0,
        }
    }

    /// A failed result carrying a status and message.
    pub(crate) fn failure(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            ..Self::empty()
        }
    }

    /// Step a prepared statement to completion and collect its output.
    ///
    /// The statement is not finalized; the caller keeps ownership of it.
    ///
    /// # Safety
    /// `db` and `stmt` must be valid, and `stmt` must belong to `db`.
    pub(crate) unsafe fn collect(db: *mut ffi::sqlite3, stmt: *mut ffi::sqlite3_stmt) -> Self {
        // SAFETY: upheld by the caller
        unsafe {
            let col_count = ffi::sqlite3_column_count(stmt);
            let mut names = Vec::with_capacity(usize::try_from(col_count).unwrap_or(0));
            let mut declared = Vec::with_capacity(names.capacity());
            for i in 0..col_count {
                names.push(types::column_name(stmt, i).unwrap_or_else(|| format!("col{}", i)));
                declared.push(
                    types::column_decltype(stmt, i)
                        .as_deref()
                        .and_then(types::column_type_from_decl),
                );
            }

            let changes_before = ffi::sqlite3_total_changes(db);
            let mut rows = Vec::new();
            loop {
                match ffi::sqlite3_step(stmt) {
                    ffi::SQLITE_ROW => {
                        let row: Vec<Value> =
                            (0..col_count).map(|i| types::read_column(stmt, i)).collect();
                        rows.push(row);
                    }
                    ffi::SQLITE_DONE => break,
                    rc => {
                        let message = ffi::last_error(db);
                        ffi::sqlite3_reset(stmt);
                        return Self::failure(rc, message);
                    }
                }
            }
            // sqlite3_changes keeps the count of the last data-changing
            // statement, so it is only read when this one changed something.
            // Rows written by triggers are excluded.
            let affected_rows = if ffi::sqlite3_total_changes(db) > changes_before {
                u64::try_from(ffi::sqlite3_changes(db)).unwrap_or(0)
            } else {
                0
            };

            let columns: Vec<ColumnDesc> = names
                .into_iter()
                .zip(declared)
                .enumerate()
                .map(|(i, (name, ty))| {
                    let ty = ty.unwrap_or_else(|| infer_type(&rows, i));
                    ColumnDesc::new(name, ty)
                })
                .collect();

            Self {
                status: STATUS_OK,
                message: String::new(),
                columns: Arc::from(columns),
                rows,
                affected_rows,
                cursor: 0,
            }
        }
    }
}

fn infer_type(rows: &[Vec<Value>], ordinal: usize) -> ColumnType {
    rows.first()
        .and_then(|row| row.get(ordinal))
        .map_or(ColumnType::Null, types::column_type_from_value)
}

impl ResultHandle for SqliteResult {
    type Row = usize;
    type Meta = Arc<[ColumnDesc]>;

    fn status(&self) -> i32 {
        self.status
    }

    fn message(&self) -> &str {
        &self.message
    }

    #[allow(clippy::cast_possible_truncation)]
    fn column_count(&self) -> u16 {
        self.columns.len().min(usize::from(u16::MAX)) as u16
    }

    fn row_count(&self) -> u64 {
        self.rows.len() as u64
    }

    fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    fn column_meta(&self) -> Self::Meta {
        Arc::clone(&self.columns)
    }

    fn fetch_row(&mut self) -> Option<usize> {
        if self.cursor < self.rows.len() {
            let row = self.cursor;
            self.cursor += 1;
            Some(row)
        } else {
            None
        }
    }

    fn value(&self, row: usize, ordinal: u16) -> Option<&Value> {
        self.rows.get(row)?.get(usize::from(ordinal))
    }

    fn free(self) {
        tracing::trace!(rows = self.rows.len(), "Freeing result");
    }
}
