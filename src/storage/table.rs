//! Row storage with secondary index maintenance.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::datum::{DataType, Value};

use super::error::StorageError;
use super::index::{AnyIndex, BPlusIndex, IndexKey};
use super::schema::Schema;
use super::tuple::{Rid, Tuple};

/// A registered secondary index and its column binding.
#[derive(Debug)]
pub struct IndexInfo {
    /// Position of the indexed column in the table schema.
    pub column_index: usize,
    /// Key type of the index, equal to the column's type.
    pub data_type: DataType,
    /// The index itself.
    pub index: AnyIndex,
}

/// A table: a sealed schema, live rows keyed by rid, and the secondary
/// indices defined on them.
///
/// Every mutation keeps each index exactly in step with the live rows: for
/// an index on column `c`, the multiset of `(key, rid)` pairs it holds
/// always equals `{(row.field(c), rid)}` over the live rows.
#[derive(Debug)]
pub struct Table {
    schema: Rc<Schema>,
    tuples: BTreeMap<Rid, Tuple>,
    next_rid: Rid,
    indexes: BTreeMap<String, IndexInfo>,
}

impl Table {
    /// Creates an empty table with the given schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Rc::new(schema),
            tuples: BTreeMap::new(),
            next_rid: 0,
            indexes: BTreeMap::new(),
        }
    }

    /// The table's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// A shared handle to the table's schema, for building row tuples.
    pub fn schema_handle(&self) -> Rc<Schema> {
        Rc::clone(&self.schema)
    }

    /// Validates and stores a new row, adding it to every index.
    ///
    /// Returns the rid allocated for the row. Validation happens before
    /// anything is written, so a failure leaves the table untouched.
    pub fn insert_tuple(&mut self, fields: Vec<Value>) -> Result<Rid, StorageError> {
        let tuple = Tuple::new(Rc::clone(&self.schema), fields)?;
        let rid = self.next_rid;
        self.next_rid += 1;
        for (name, info) in self.indexes.iter_mut() {
            let field = &tuple.fields()[info.column_index];
            if !info.index.insert_value(field, rid) {
                return Err(StorageError::IndexTypeMismatch {
                    name: name.clone(),
                    expected: info.data_type,
                    found: field.data_type(),
                });
            }
        }
        self.tuples.insert(rid, tuple);
        Ok(rid)
    }

    /// Returns the row stored under `rid`.
    pub fn get_tuple(&self, rid: Rid) -> Result<&Tuple, StorageError> {
        self.tuples
            .get(&rid)
            .ok_or(StorageError::TupleNotFound { rid })
    }

    /// Removes a row, unlinking it from every index first.
    ///
    /// Returns false if no live row has this rid. The rid is not reused.
    pub fn remove_tuple(&mut self, rid: Rid) -> bool {
        let Some(tuple) = self.tuples.get(&rid) else {
            return false;
        };
        for info in self.indexes.values_mut() {
            let field = &tuple.fields()[info.column_index];
            info.index.remove_value(field, rid);
        }
        self.tuples.remove(&rid);
        true
    }

    /// Replaces the row stored under `rid`, re-keying every index entry
    /// even when the indexed value is unchanged (a net no-op in that case).
    ///
    /// Returns false if no live row has this rid.
    pub fn update_tuple(&mut self, rid: Rid, fields: Vec<Value>) -> Result<bool, StorageError> {
        let Some(old) = self.tuples.get(&rid) else {
            return Ok(false);
        };
        let new = Tuple::new(Rc::clone(&self.schema), fields)?;
        for info in self.indexes.values_mut() {
            let old_field = &old.fields()[info.column_index];
            let new_field = &new.fields()[info.column_index];
            info.index.remove_value(old_field, rid);
            info.index.insert_value(new_field, rid);
        }
        self.tuples.insert(rid, new);
        Ok(true)
    }

    /// Rids of all live rows, in ascending allocation order.
    pub fn all_rids(&self) -> Vec<Rid> {
        self.tuples.keys().copied().collect()
    }

    /// Number of live rows.
    pub fn row_count(&self) -> usize {
        self.tuples.len()
    }

    /// Builds a new index over one column and registers it under `name`.
    ///
    /// The index is populated from every live row before registration, so
    /// a failure leaves the table without the index.
    pub fn create_index<K: IndexKey>(
        &mut self,
        name: &str,
        column_index: usize,
        degree: usize,
    ) -> Result<(), StorageError> {
        if self.indexes.contains_key(name) {
            return Err(StorageError::IndexAlreadyExists {
                name: name.to_string(),
            });
        }
        let column = self.schema.column(column_index)?;
        if column.data_type != K::DATA_TYPE {
            return Err(StorageError::IndexTypeMismatch {
                name: name.to_string(),
                expected: column.data_type,
                found: K::DATA_TYPE,
            });
        }
        let mut index = BPlusIndex::<K>::new(degree);
        for (rid, tuple) in &self.tuples {
            let field = &tuple.fields()[column_index];
            let Some(key) = K::from_value(field) else {
                return Err(StorageError::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.data_type,
                    found: field.data_type(),
                });
            };
            index.insert(key, *rid);
        }
        self.indexes.insert(
            name.to_string(),
            IndexInfo {
                column_index,
                data_type: K::DATA_TYPE,
                index: K::into_any(index),
            },
        );
        Ok(())
    }

    /// Typed accessor for a registered index.
    pub fn get_index<K: IndexKey>(&self, name: &str) -> Result<&BPlusIndex<K>, StorageError> {
        let info = self
            .indexes
            .get(name)
            .ok_or_else(|| StorageError::IndexNotFound {
                name: name.to_string(),
            })?;
        K::from_any(&info.index).ok_or_else(|| StorageError::IndexTypeMismatch {
            name: name.to_string(),
            expected: info.data_type,
            found: K::DATA_TYPE,
        })
    }
}
