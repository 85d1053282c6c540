//! Forward-only result cursors.
//!
//! A [`ResultSet`] owns the engine result handle of one execution. It moves
//! through three states:
//!
//! - **Active**: a handle is attached and rows remain
//! - **Closed**: the handle has been released, either because [`ResultSet::next`]
//!   ran past the last row or because [`ResultSet::close`] was called
//!
//! Closed is terminal. Closing again is a no-op, and every read on a closed
//! cursor returns `None`.
//!
//! The handle sits in a shared cell so that the statement which produced the
//! cursor can release it when a newer query replaces it. The cursor then
//! behaves as closed.

use crate::metadata::ResultSetMetaData;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};
use xdbc_core::{ColumnMetadata, Engine, EngineMeta, EngineRow, FromValue, ResultHandle, Value};

/// Shared cell holding a cursor's result handle.
pub(crate) type HandleCell<R> = Rc<RefCell<Option<R>>>;

/// A column reference: a zero-based ordinal or a column name.
///
/// Ordinals are passed through to the engine, which answers `None` for
/// positions outside the column set. Names are resolved through the
/// cursor's name index; an unknown name resolves to `None`.
pub trait ColumnIndex {
    fn resolve<E: Engine>(&self, rs: &ResultSet<'_, E>) -> Option<u16>;
}

impl ColumnIndex for u16 {
    fn resolve<E: Engine>(&self, _rs: &ResultSet<'_, E>) -> Option<u16> {
        Some(*self)
    }
}

impl ColumnIndex for usize {
    fn resolve<E: Engine>(&self, _rs: &ResultSet<'_, E>) -> Option<u16> {
        u16::try_from(*self).ok()
    }
}

impl ColumnIndex for i32 {
    fn resolve<E: Engine>(&self, _rs: &ResultSet<'_, E>) -> Option<u16> {
        u16::try_from(*self).ok()
    }
}

impl ColumnIndex for &str {
    fn resolve<E: Engine>(&self, rs: &ResultSet<'_, E>) -> Option<u16> {
        rs.find_column(self)
    }
}

impl ColumnIndex for &String {
    fn resolve<E: Engine>(&self, rs: &ResultSet<'_, E>) -> Option<u16> {
        rs.find_column(self)
    }
}

impl ColumnIndex for String {
    fn resolve<E: Engine>(&self, rs: &ResultSet<'_, E>) -> Option<u16> {
        rs.find_column(self)
    }
}

/// A lazily iterated cursor over the rows of one execution.
///
/// The cursor borrows the statement context that produced it, so the
/// connection (and, for prepared statements, the compiled statement)
/// outlives it.
///
/// # Example
///
/// ```rust,ignore
/// let mut rs = conn.execute_query("SELECT id, name FROM student")?;
/// while rs.next() {
///     let id: Option<i32> = rs.get_int("id");
///     let name = rs.get_string(1);
/// }
/// // Exhaustion released the engine result; metadata is still readable.
/// assert_eq!(rs.metadata().column_count(), 2);
/// ```
pub struct ResultSet<'a, E: Engine> {
    handle: HandleCell<E::Result>,
    row: Option<EngineRow<E>>,
    meta: EngineMeta<E>,
    index: OnceCell<HashMap<String, u16>>,
    _context: PhantomData<&'a ()>,
}

impl<'a, E: Engine> ResultSet<'a, E> {
    /// Take ownership of a successful engine result.
    pub(crate) fn attach(result: E::Result) -> Self {
        let meta = result.column_meta();
        Self {
            handle: Rc::new(RefCell::new(Some(result))),
            row: None,
            meta,
            index: OnceCell::new(),
            _context: PhantomData,
        }
    }

    /// Weak reference to the handle cell, for the issuing statement's slot.
    pub(crate) fn downgrade(&self) -> Weak<RefCell<Option<E::Result>>> {
        Rc::downgrade(&self.handle)
    }

    /// Advance to the next row.
    ///
    /// Returns `false` once the rows are exhausted, releasing the engine
    /// result at that point. Later calls keep returning `false`.
    pub fn next(&mut self) -> bool {
        let mut cell = self.handle.borrow_mut();
        let Some(result) = cell.as_mut() else {
            self.row = None;
            return false;
        };

        if let Some(row) = result.fetch_row() {
            self.row = Some(row);
            return true;
        }

        self.row = None;
        if let Some(result) = cell.take() {
            tracing::trace!("Result exhausted, releasing");
            result.free();
        }
        false
    }

    /// Release the engine result if it is still held.
    pub fn close(&mut self) {
        self.row = None;
        let taken = self.handle.borrow_mut().take();
        if let Some(result) = taken {
            tracing::trace!("Closing result");
            result.free();
        }
    }

    /// Whether the engine result has been released.
    pub fn is_closed(&self) -> bool {
        self.handle.borrow().is_none()
    }

    /// Total rows the engine reported for this execution, or 0 once closed.
    pub fn rows_count(&self) -> u64 {
        self.handle.borrow().as_ref().map_or(0, ResultHandle::row_count)
    }

    /// Rows affected by this execution, or 0 once closed.
    pub fn update_count(&self) -> u64 {
        self.handle
            .borrow()
            .as_ref()
            .map_or(0, ResultHandle::affected_rows)
    }

    pub fn column_count(&self) -> u16 {
        self.meta.column_count()
    }

    /// Column metadata of this result. Stays readable after the cursor closes.
    pub fn metadata(&self) -> ResultSetMetaData<'_, E> {
        ResultSetMetaData::new(&self.meta)
    }

    /// Ordinal of the first column called `name`.
    ///
    /// The name index is built from the column metadata on first use and
    /// reused for the life of the cursor.
    pub fn find_column(&self, name: &str) -> Option<u16> {
        self.index
            .get_or_init(|| build_index(&self.meta))
            .get(name)
            .copied()
    }

    pub fn get_int<C: ColumnIndex>(&self, column: C) -> Option<i32> {
        self.read(column)
    }

    pub fn get_int64<C: ColumnIndex>(&self, column: C) -> Option<i64> {
        self.read(column)
    }

    pub fn get_float<C: ColumnIndex>(&self, column: C) -> Option<f32> {
        self.read(column)
    }

    pub fn get_double<C: ColumnIndex>(&self, column: C) -> Option<f64> {
        self.read(column)
    }

    pub fn get_string<C: ColumnIndex>(&self, column: C) -> Option<String> {
        self.read(column)
    }

    pub fn get_bytes<C: ColumnIndex>(&self, column: C) -> Option<Vec<u8>> {
        self.read(column)
    }

    /// Whether the current row holds NULL in `column`.
    ///
    /// `false` when there is no such cell.
    pub fn is_null<C: ColumnIndex>(&self, column: C) -> bool {
        self.with_cell(column, Value::is_null).unwrap_or(false)
    }

    /// Read the current row's cell in `column` as `T`.
    ///
    /// `None` when there is no current row, the cursor is closed, the
    /// column does not exist, the cell is NULL or it does not convert.
    pub fn read<T: FromValue, C: ColumnIndex>(&self, column: C) -> Option<T> {
        self.with_cell(column, T::from_value).flatten()
    }

    fn with_cell<R, C: ColumnIndex>(&self, column: C, f: impl FnOnce(&Value) -> R) -> Option<R> {
        let ordinal = column.resolve(self)?;
        let row = self.row?;
        let cell = self.handle.borrow();
        let value = cell.as_ref()?.value(row, ordinal)?;
        Some(f(value))
    }
}

fn build_index<M: ColumnMetadata>(meta: &M) -> HashMap<String, u16> {
    let count = meta.column_count();
    let mut index = HashMap::with_capacity(usize::from(count));
    for ordinal in 0..count {
        if let Some(desc) = meta.column(ordinal) {
            index.entry(desc.name().to_string()).or_insert(ordinal);
        }
    }
    tracing::trace!(columns = count, "Built column name index");
    index
}

impl<E: Engine> Drop for ResultSet<'_, E> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<E: Engine> fmt::Debug for ResultSet<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("closed", &self.is_closed())
            .field("columns", &self.column_count())
            .field("on_row", &self.row.is_some())
            .finish()
    }
}
