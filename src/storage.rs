//! Row storage: schemas, tuples, tables, and secondary indices.
//!
//! The storage layer owns all user data. A [`Table`] maps rids to validated
//! [`Tuple`]s and keeps every registered [`BPlusIndex`] consistent with the
//! live rows across inserts, updates, and deletes. Indices pair a
//! [`BPlusTree`] of keys with a key → rid multi-map, so equality and range
//! predicates resolve to rid sets without scanning.

pub mod btree;
pub mod error;
pub mod index;
pub mod schema;
pub mod table;
pub mod tuple;

pub use btree::BPlusTree;
pub use error::StorageError;
pub use index::{AnyIndex, BPlusIndex, DoubleKey, IndexKey};
pub use schema::{Column, Schema};
pub use table::{IndexInfo, Table};
pub use tuple::{Rid, Tuple};
