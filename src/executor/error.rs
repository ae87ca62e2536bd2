//! Executor errors.

use crate::catalog::CatalogError;
use crate::datum::DataType;
use crate::plan::PredicateError;
use crate::storage::StorageError;

/// Errors that can occur during statement execution.
#[derive(Debug)]
pub enum ExecutorError {
    /// Operator cannot be applied to the operand type.
    UnsupportedOperator { op: String, data_type: DataType },

    /// Column and value counts differ in an insert.
    ColumnValueCountMismatch { columns: usize, values: usize },

    /// An aggregate received input of the wrong type.
    AggregateTypeMismatch {
        expected: &'static str,
        found: DataType,
    },

    /// Malformed filter predicate.
    Predicate(PredicateError),

    /// Catalog lookup or DDL failure.
    Catalog(CatalogError),

    /// Row, schema, or index access failure.
    Storage(StorageError),
}

impl std::fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutorError::UnsupportedOperator { op, data_type } => {
                write!(f, "operator {} is not supported for {} values", op, data_type)
            }
            ExecutorError::ColumnValueCountMismatch { columns, values } => {
                write!(f, "INSERT names {} columns but supplies {} values", columns, values)
            }
            ExecutorError::AggregateTypeMismatch { expected, found } => {
                write!(f, "aggregate input mismatch: expected {}, found {}", expected, found)
            }
            ExecutorError::Predicate(e) => write!(f, "{}", e),
            ExecutorError::Catalog(e) => write!(f, "{}", e),
            ExecutorError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecutorError::Predicate(e) => Some(e),
            ExecutorError::Catalog(e) => Some(e),
            ExecutorError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PredicateError> for ExecutorError {
    fn from(e: PredicateError) -> Self {
        ExecutorError::Predicate(e)
    }
}

impl From<CatalogError> for ExecutorError {
    fn from(e: CatalogError) -> Self {
        ExecutorError::Catalog(e)
    }
}

impl From<StorageError> for ExecutorError {
    fn from(e: StorageError) -> Self {
        ExecutorError::Storage(e)
    }
}
