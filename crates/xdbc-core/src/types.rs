//! Column type tags and column descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Type tag the engine reports for a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// No declared type and no value to infer one from
    Null,
    Bool,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Timestamp,
    Char,
    VarChar,
    Binary,
    VarBinary,
}

impl ColumnType {
    /// Stable numeric code of this tag.
    pub const fn code(self) -> u8 {
        match self {
            ColumnType::Null => 0,
            ColumnType::Bool => 1,
            ColumnType::TinyInt => 2,
            ColumnType::SmallInt => 3,
            ColumnType::Int => 4,
            ColumnType::BigInt => 5,
            ColumnType::Float => 6,
            ColumnType::Double => 7,
            ColumnType::Timestamp => 8,
            ColumnType::Char => 9,
            ColumnType::VarChar => 10,
            ColumnType::Binary => 11,
            ColumnType::VarBinary => 12,
        }
    }

    /// Display name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            ColumnType::Null => "NULL",
            ColumnType::Bool => "BOOL",
            ColumnType::TinyInt => "TINYINT",
            ColumnType::SmallInt => "SMALLINT",
            ColumnType::Int => "INT",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Float => "FLOAT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Char => "CHAR",
            ColumnType::VarChar => "VARCHAR",
            ColumnType::Binary => "BINARY",
            ColumnType::VarBinary => "VARBINARY",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name and type of one result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDesc {
    name: String,
    column_type: ColumnType,
}

impl ColumnDesc {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }
}

/// Read access to a result's column descriptors.
///
/// Engines hand out an implementation of this as the column-metadata
/// reference of a result; it must be cheap to clone.
pub trait ColumnMetadata {
    /// Number of columns.
    fn column_count(&self) -> u16;

    /// Descriptor of the column at a zero-based ordinal.
    fn column(&self, ordinal: u16) -> Option<&ColumnDesc>;
}

impl ColumnMetadata for Arc<[ColumnDesc]> {
    #[allow(clippy::cast_possible_truncation)]
    fn column_count(&self) -> u16 {
        self.len().min(usize::from(u16::MAX)) as u16
    }

    fn column(&self, ordinal: u16) -> Option<&ColumnDesc> {
        self.get(usize::from(ordinal))
    }
}
