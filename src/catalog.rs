//! Catalog: named user tables plus the system tables describing them.
//!
//! The [`Catalog`] owns every [`Table`](crate::storage::Table) and records
//! DDL outcomes in four typed system tables (`tables`, `columns`,
//! `indexes`, `index_columns`). The system tables are private catalog
//! state: only DDL mutates them, never user DML.

pub mod core;
pub mod error;
pub mod system;

pub use self::core::Catalog;
pub use error::CatalogError;
pub use system::{ColumnRecord, IndexColumnRecord, IndexRecord, SystemTable, TableRecord};
