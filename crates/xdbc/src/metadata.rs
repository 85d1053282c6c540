//! Read-only view over a result's column descriptors.

use std::fmt;
use xdbc_core::{ColumnMetadata, ColumnType, Engine, EngineMeta};

/// Column metadata of a [`ResultSet`](crate::ResultSet).
///
/// Borrowed from the cursor; it cannot outlive it.
pub struct ResultSetMetaData<'r, E: Engine> {
    meta: &'r EngineMeta<E>,
}

impl<'r, E: Engine> ResultSetMetaData<'r, E> {
    pub(crate) fn new(meta: &'r EngineMeta<E>) -> Self {
        Self { meta }
    }

    pub fn column_count(&self) -> u16 {
        self.meta.column_count()
    }

    pub fn column_name(&self, ordinal: u16) -> Option<&'r str> {
        self.meta.column(ordinal).map(|c| c.name())
    }

    pub fn column_type(&self, ordinal: u16) -> Option<ColumnType> {
        self.meta.column(ordinal).map(|c| c.column_type())
    }

    /// Display name of the column's type tag, e.g. `"VARCHAR"`.
    pub fn column_type_name(&self, ordinal: u16) -> Option<&'static str> {
        self.column_type(ordinal).map(ColumnType::name)
    }
}

impl<E: Engine> fmt::Debug for ResultSetMetaData<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = (0..self.column_count())
            .filter_map(|i| self.column_name(i))
            .collect();
        f.debug_struct("ResultSetMetaData")
            .field("columns", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::ResultSet;
    use xdbc_core::{ColumnType, ConnectionHandle, Engine, ResultHandle};
    use xdbc_sqlite::SqliteEngine;

    #[test]
    fn test_column_descriptors() {
        let conn = SqliteEngine::default().open(":memory:").unwrap();
        conn.exec("CREATE TABLE student (id INT PRIMARY KEY, name CHAR(16), bio VARCHAR(255))")
            .free();

        let rs: ResultSet<'_, SqliteEngine> =
            ResultSet::attach(conn.exec("SELECT id, name, bio FROM student"));
        let meta = rs.metadata();

        assert_eq!(meta.column_count(), 3);
        assert_eq!(meta.column_name(0), Some("id"));
        assert_eq!(meta.column_type(0), Some(ColumnType::Int));
        assert_eq!(meta.column_type_name(0), Some("INT"));
        assert_eq!(meta.column_type(1), Some(ColumnType::Char));
        assert_eq!(meta.column_type_name(2), Some("VARCHAR"));
        assert!(format!("{:?}", meta).contains("bio"));

        // Out of range
        assert_eq!(meta.column_name(3), None);
        assert_eq!(meta.column_type_name(3), None);

        drop(rs);
        conn.close();
    }
}
