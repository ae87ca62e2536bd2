//! Catalog errors.

use crate::storage::StorageError;

/// Errors from catalog operations.
#[derive(Debug)]
pub enum CatalogError {
    /// Table name is already taken.
    TableAlreadyExists { name: String },

    /// No table with the given name.
    TableNotFound { name: String },

    /// A column is missing from the `columns` system table.
    ColumnNotRecorded { table: String, column: String },

    /// Underlying table or index operation failed.
    Storage(StorageError),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::TableAlreadyExists { name } => {
                write!(f, "table \"{}\" already exists", name)
            }
            CatalogError::TableNotFound { name } => {
                write!(f, "table \"{}\" does not exist", name)
            }
            CatalogError::ColumnNotRecorded { table, column } => {
                write!(
                    f,
                    "column \"{}\" of table \"{}\" is not recorded in the system catalog",
                    column, table
                )
            }
            CatalogError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for CatalogError {
    fn from(e: StorageError) -> Self {
        CatalogError::Storage(e)
    }
}
