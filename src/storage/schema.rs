//! Table schemas.

use crate::datum::DataType;

use super::error::StorageError;

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within its schema.
    pub name: String,
    /// Declared type of the column's values.
    pub data_type: DataType,
}

impl Column {
    /// Creates a new column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered list of columns.
///
/// The column order is the declaration order. Schemas are immutable once
/// constructed; tables hand out shared handles to their one authoritative
/// schema rather than copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Creates a schema from a column list.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the column at `index`.
    pub fn column(&self, index: usize) -> Result<&Column, StorageError> {
        self.columns
            .get(index)
            .ok_or(StorageError::ColumnIndexOutOfRange {
                index,
                count: self.columns.len(),
            })
    }

    /// Returns the position of the column named `name`.
    pub fn index_of(&self, name: &str) -> Result<usize, StorageError> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| StorageError::ColumnNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            Column::new("id", DataType::Integer),
            Column::new("name", DataType::Varchar),
            Column::new("score", DataType::Double),
        ])
    }

    #[test]
    fn test_len_and_columns() {
        let schema = sample_schema();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.columns()[1].name, "name");
        assert_eq!(schema.columns()[2].data_type, DataType::Double);
    }

    #[test]
    fn test_column_by_index() {
        let schema = sample_schema();
        assert_eq!(schema.column(0).unwrap().name, "id");
        assert_eq!(
            schema.column(3),
            Err(StorageError::ColumnIndexOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn test_index_of() {
        let schema = sample_schema();
        assert_eq!(schema.index_of("score").unwrap(), 2);
        assert_eq!(
            schema.index_of("missing"),
            Err(StorageError::ColumnNotFound {
                name: "missing".to_string()
            })
        );
    }
}
