//! Storage-layer errors.

use crate::datum::DataType;

use super::tuple::Rid;

/// Errors from schema, tuple, table, and index operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Referenced column name does not exist in the schema.
    ColumnNotFound { name: String },

    /// Column index exceeds the schema's column count.
    ColumnIndexOutOfRange { index: usize, count: usize },

    /// Number of fields does not match the schema's column count.
    FieldCountMismatch { expected: usize, found: usize },

    /// A value's variant does not match the declared column type.
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    /// No live tuple with the given rid.
    TupleNotFound { rid: Rid },

    /// An index with the given name is already registered.
    IndexAlreadyExists { name: String },

    /// No index with the given name.
    IndexNotFound { name: String },

    /// Requested key type does not match the indexed column's type.
    IndexTypeMismatch {
        name: String,
        expected: DataType,
        found: DataType,
    },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ColumnNotFound { name } => {
                write!(f, "column \"{}\" does not exist", name)
            }
            StorageError::ColumnIndexOutOfRange { index, count } => {
                write!(
                    f,
                    "column index {} out of range for schema with {} columns",
                    index, count
                )
            }
            StorageError::FieldCountMismatch { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            StorageError::TypeMismatch {
                column,
                expected,
                found,
            } => {
                write!(
                    f,
                    "type mismatch for column \"{}\": expected {}, found {}",
                    column, expected, found
                )
            }
            StorageError::TupleNotFound { rid } => {
                write!(f, "no tuple with rid {}", rid)
            }
            StorageError::IndexAlreadyExists { name } => {
                write!(f, "index \"{}\" already exists", name)
            }
            StorageError::IndexNotFound { name } => {
                write!(f, "index \"{}\" does not exist", name)
            }
            StorageError::IndexTypeMismatch {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "index \"{}\" key type mismatch: expected {}, found {}",
                    name, expected, found
                )
            }
        }
    }
}

impl std::error::Error for StorageError {}
