//! Single-slot cache for the result a statement context last produced.

use crate::result_set::ResultSet;
use std::cell::{Cell, RefCell};
use std::rc::Weak;
use xdbc_core::{Engine, ResultHandle};

enum Slot<R> {
    Empty,
    /// A result produced by `execute`/`execute_update`, owned by the slot.
    Held(R),
    /// A result handed to the caller inside a cursor.
    Issued(Weak<RefCell<Option<R>>>),
}

/// The one live result of a statement context.
///
/// Every new execution releases the previous entry first. An issued
/// cursor is released through its shared cell, after which it reads as
/// closed.
pub struct CursorSlot<R: ResultHandle> {
    slot: RefCell<Slot<R>>,
    update_count: Cell<u64>,
}

impl<R: ResultHandle> CursorSlot<R> {
    pub fn new() -> Self {
        Self {
            slot: RefCell::new(Slot::Empty),
            update_count: Cell::new(0),
        }
    }

    /// Release whatever the slot refers to.
    pub fn release(&self) {
        match self.slot.replace(Slot::Empty) {
            Slot::Empty => {}
            Slot::Held(result) => result.free(),
            Slot::Issued(weak) => {
                if let Some(cell) = weak.upgrade() {
                    let taken = cell.borrow_mut().take();
                    if let Some(result) = taken {
                        tracing::trace!("Closing cursor replaced by a newer query");
                        result.free();
                    }
                }
            }
        }
    }

    /// Keep a result in the slot.
    pub fn hold(&self, result: R) {
        self.release();
        self.update_count.set(result.affected_rows());
        self.slot.replace(Slot::Held(result));
    }

    /// Wrap a result in a caller-owned cursor, remembering it in the slot.
    pub fn issue<'a, E>(&self, result: R) -> ResultSet<'a, E>
    where
        E: Engine<Result = R>,
    {
        self.release();
        self.update_count.set(result.affected_rows());
        let cursor = ResultSet::attach(result);
        self.slot.replace(Slot::Issued(cursor.downgrade()));
        cursor
    }

    /// Affected-row count of the most recent execution.
    pub fn update_count(&self) -> u64 {
        self.update_count.get()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Empty)
    }
}

impl<R: ResultHandle> Default for CursorSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ResultHandle> Drop for CursorSlot<R> {
    fn drop(&mut self) {
        self.release();
    }
}
