//! Type mapping between SQLite and xdbc.
//!
//! SQLite has a simple type system with 5 storage classes:
//! - INTEGER: Signed integer (1, 2, 3, 4, 6, or 8 bytes)
//! - REAL: 8-byte IEEE floating point
//! - TEXT: UTF-8 or UTF-16 string
//! - BLOB: Binary data
//! - NULL: The NULL value
//!
//! Cells map onto [`Value`]. Column type tags come from the declared type
//! of the column, or from the storage class of the first row when the
//! column is an expression with no declared type.

use crate::ffi;
use std::ffi::{CStr, c_int};
use xdbc_core::{ColumnType, Value};

/// Map a declared column type to a type tag.
///
/// Matching is by substring, most specific first, the same way SQLite
/// derives column affinity.
pub fn column_type_from_decl(decl: &str) -> Option<ColumnType> {
    let decl = decl.to_ascii_uppercase();
    let has = |needle: &str| decl.contains(needle);

    let ty = if has("BIGINT") {
        ColumnType::BigInt
    } else if has("TINYINT") {
        ColumnType::TinyInt
    } else if has("SMALLINT") {
        ColumnType::SmallInt
    } else if has("BOOL") {
        ColumnType::Bool
    } else if has("INT") {
        ColumnType::Int
    } else if has("VARBINARY") || has("BLOB") {
        ColumnType::VarBinary
    } else if has("BINARY") {
        ColumnType::Binary
    } else if has("VARCHAR") || has("VARYING") || has("TEXT") || has("CLOB") {
        ColumnType::VarChar
    } else if has("CHAR") {
        ColumnType::Char
    } else if has("DOUBLE") || has("REAL") || has("NUMERIC") || has("DECIMAL") {
        ColumnType::Double
    } else if has("FLOAT") {
        ColumnType::Float
    } else if has("TIMESTAMP") || has("DATE") || has("TIME") {
        ColumnType::Timestamp
    } else {
        return None;
    };
    Some(ty)
}

/// Type tag for a column with no declared type, from one of its cells.
pub fn column_type_from_value(value: &Value) -> ColumnType {
    match value {
        Value::Null => ColumnType::Null,
        Value::Integer(_) => ColumnType::BigInt,
        Value::Double(_) => ColumnType::Double,
        Value::Text(_) => ColumnType::VarChar,
        Value::Bytes(_) => ColumnType::VarBinary,
    }
}

/// Read a column value from the current row.
///
/// # Safety
/// - `stmt` must be a valid prepared statement that has just returned SQLITE_ROW
/// - `index` must be a valid 0-based column index
pub unsafe fn read_column(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Value {
    // SAFETY: upheld by the caller
    unsafe {
        match ffi::sqlite3_column_type(stmt, index) {
            ffi::SQLITE_INTEGER => Value::Integer(ffi::sqlite3_column_int64(stmt, index)),

            ffi::SQLITE_FLOAT => Value::Double(ffi::sqlite3_column_double(stmt, index)),

            ffi::SQLITE_TEXT => {
                let ptr = ffi::sqlite3_column_text(stmt, index);
                let len = ffi::sqlite3_column_bytes(stmt, index);
                if ptr.is_null() {
                    Value::Null
                } else {
                    let slice =
                        std::slice::from_raw_parts(ptr.cast::<u8>(), usize::try_from(len).unwrap_or(0));
                    Value::Text(String::from_utf8_lossy(slice).into_owned())
                }
            }

            ffi::SQLITE_BLOB => {
                let ptr = ffi::sqlite3_column_blob(stmt, index);
                let len = ffi::sqlite3_column_bytes(stmt, index);
                if ptr.is_null() || len <= 0 {
                    Value::Bytes(Vec::new())
                } else {
                    let slice =
                        std::slice::from_raw_parts(ptr.cast::<u8>(), usize::try_from(len).unwrap_or(0));
                    Value::Bytes(slice.to_vec())
                }
            }

            _ => Value::Null,
        }
    }
}

/// Get the column name (alias if one was given) from a statement.
///
/// # Safety
/// - `stmt` must be a valid prepared statement
/// - `index` must be a valid 0-based column index
pub unsafe fn column_name(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Option<String> {
    // SAFETY: upheld by the caller
    unsafe {
        let ptr = ffi::sqlite3_column_name(stmt, index);
        if ptr.is_null() {
            None
        } else {
            Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
        }
    }
}

/// Get the declared type of a column, if it is a table column.
///
/// # Safety
/// - `stmt` must be a valid prepared statement
/// - `index` must be a valid 0-based column index
pub unsafe fn column_decltype(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Option<String> {
    // SAFETY: upheld by the caller
    unsafe {
        let ptr = ffi::sqlite3_column_decltype(stmt, index);
        if ptr.is_null() {
            None
        } else {
            Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_declarations() {
        assert_eq!(column_type_from_decl("INT"), Some(ColumnType::Int));
        assert_eq!(column_type_from_decl("integer"), Some(ColumnType::Int));
        assert_eq!(column_type_from_decl("BIGINT"), Some(ColumnType::BigInt));
        assert_eq!(column_type_from_decl("TINYINT"), Some(ColumnType::TinyInt));
        assert_eq!(column_type_from_decl("SMALLINT"), Some(ColumnType::SmallInt));
        assert_eq!(column_type_from_decl("BOOLEAN"), Some(ColumnType::Bool));
    }

    #[test]
    fn test_text_declarations() {
        assert_eq!(column_type_from_decl("CHAR(16)"), Some(ColumnType::Char));
        assert_eq!(column_type_from_decl("VARCHAR(255)"), Some(ColumnType::VarChar));
        assert_eq!(column_type_from_decl("TEXT"), Some(ColumnType::VarChar));
        assert_eq!(
            column_type_from_decl("CHARACTER VARYING(8)"),
            Some(ColumnType::VarChar)
        );
    }

    #[test]
    fn test_other_declarations() {
        assert_eq!(column_type_from_decl("DOUBLE"), Some(ColumnType::Double));
        assert_eq!(column_type_from_decl("REAL"), Some(ColumnType::Double));
        assert_eq!(column_type_from_decl("FLOAT"), Some(ColumnType::Float));
        assert_eq!(column_type_from_decl("BLOB"), Some(ColumnType::VarBinary));
        assert_eq!(column_type_from_decl("BINARY(4)"), Some(ColumnType::Binary));
        assert_eq!(column_type_from_decl("TIMESTAMP"), Some(ColumnType::Timestamp));
        assert_eq!(column_type_from_decl("WIDGET"), None);
    }

    #[test]
    fn test_type_from_value() {
        assert_eq!(column_type_from_value(&Value::Integer(3)), ColumnType::BigInt);
        assert_eq!(column_type_from_value(&Value::Double(1.0)), ColumnType::Double);
        assert_eq!(
            column_type_from_value(&Value::Text(String::new())),
            ColumnType::VarChar
        );
        assert_eq!(column_type_from_value(&Value::Null), ColumnType::Null);
    }
}
