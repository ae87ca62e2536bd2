//! Main catalog implementation.

use std::collections::HashMap;

use tracing::debug;

use crate::storage::{IndexKey, Schema, Table};

use super::error::CatalogError;
use super::system::{
    ColumnRecord, IndexColumnRecord, IndexRecord, SystemTable, TableRecord,
};

/// Named tables plus the four system tables describing them.
///
/// The id counters are process-lifetime monotone; dropping an object never
/// frees its id for reuse.
#[derive(Debug)]
pub struct Catalog {
    tables: HashMap<String, Table>,
    tables_meta: SystemTable<TableRecord>,
    columns_meta: SystemTable<ColumnRecord>,
    indexes_meta: SystemTable<IndexRecord>,
    index_columns_meta: SystemTable<IndexColumnRecord>,
    next_table_id: i64,
    next_column_id: i64,
    next_index_id: i64,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            tables_meta: SystemTable::new(),
            columns_meta: SystemTable::new(),
            indexes_meta: SystemTable::new(),
            index_columns_meta: SystemTable::new(),
            next_table_id: 0,
            next_column_id: 0,
            next_index_id: 0,
        }
    }

    /// Creates an empty table and records it in the system catalog.
    ///
    /// Appends one `tables` row and one `columns` row per schema column.
    pub fn create_table(&mut self, name: &str, schema: Schema) -> Result<(), CatalogError> {
        if self.tables.contains_key(name) {
            return Err(CatalogError::TableAlreadyExists {
                name: name.to_string(),
            });
        }
        let table_id = self.next_table_id;
        self.next_table_id += 1;
        self.tables_meta.add(TableRecord {
            table_id,
            table_name: name.to_string(),
        });
        for column in schema.columns() {
            let column_id = self.next_column_id;
            self.next_column_id += 1;
            self.columns_meta.add(ColumnRecord {
                column_id,
                table_id,
                column_name: column.name.clone(),
                data_type: column.data_type,
            });
        }
        self.tables.insert(name.to_string(), Table::new(schema));
        debug!(table = name, table_id, "created table");
        Ok(())
    }

    /// Returns true if a table with this name exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns the table with this name.
    pub fn get_table(&self, name: &str) -> Result<&Table, CatalogError> {
        self.tables
            .get(name)
            .ok_or_else(|| CatalogError::TableNotFound {
                name: name.to_string(),
            })
    }

    /// Mutable access to the table with this name.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table, CatalogError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| CatalogError::TableNotFound {
                name: name.to_string(),
            })
    }

    fn table_id(&self, name: &str) -> Result<i64, CatalogError> {
        self.tables_meta
            .find(|r| r.table_name == name)
            .first()
            .map(|r| r.table_id)
            .ok_or_else(|| CatalogError::TableNotFound {
                name: name.to_string(),
            })
    }

    /// Drops a table, removing its `tables` row, its `indexes` rows, and
    /// the `index_columns` rows of those indexes. `columns` rows stay
    /// behind; ids are never reused, so they cannot alias a later table.
    pub fn drop_table(&mut self, name: &str) -> Result<(), CatalogError> {
        if !self.tables.contains_key(name) {
            return Err(CatalogError::TableNotFound {
                name: name.to_string(),
            });
        }
        let table_id = self.table_id(name)?;
        let index_ids: Vec<i64> = self
            .indexes_meta
            .find(|r| r.table_id == table_id)
            .iter()
            .map(|r| r.index_id)
            .collect();
        self.indexes_meta.remove_where(|r| r.table_id == table_id);
        self.index_columns_meta
            .remove_where(|r| index_ids.contains(&r.index_id));
        self.tables_meta.remove_where(|r| r.table_id == table_id);
        self.tables.remove(name);
        debug!(table = name, table_id, "dropped table");
        Ok(())
    }

    /// Creates a secondary index through the table and records it in the
    /// system catalog.
    ///
    /// Appends one `indexes` row and one `index_columns` row (ordinal
    /// position 1; single-column indices only). Nothing is recorded if the
    /// table rejects the index.
    pub fn create_index<K: IndexKey>(
        &mut self,
        index_name: &str,
        table_name: &str,
        column_index: usize,
        degree: usize,
    ) -> Result<(), CatalogError> {
        let table_id = self.table_id(table_name)?;
        let table = self
            .tables
            .get_mut(table_name)
            .ok_or_else(|| CatalogError::TableNotFound {
                name: table_name.to_string(),
            })?;
        let column_name = table.schema().column(column_index)?.name.clone();
        let column_id = self
            .columns_meta
            .find(|r| r.table_id == table_id && r.column_name == column_name)
            .first()
            .map(|r| r.column_id)
            .ok_or_else(|| CatalogError::ColumnNotRecorded {
                table: table_name.to_string(),
                column: column_name.clone(),
            })?;
        table.create_index::<K>(index_name, column_index, degree)?;
        let index_id = self.next_index_id;
        self.next_index_id += 1;
        self.indexes_meta.add(IndexRecord {
            index_id,
            index_name: index_name.to_string(),
            table_id,
        });
        self.index_columns_meta.add(IndexColumnRecord {
            index_id,
            column_id,
            ordinal_position: 1,
        });
        debug!(
            index = index_name,
            table = table_name,
            column = %column_name,
            "created index"
        );
        Ok(())
    }

    /// Returns each index on `table_name` together with its column names
    /// in ordinal order.
    pub fn get_indexes_for_table(
        &self,
        table_name: &str,
    ) -> Result<Vec<(IndexRecord, Vec<String>)>, CatalogError> {
        let table_id = self.table_id(table_name)?;
        let mut result = Vec::new();
        for index_record in self.indexes_meta.find(|r| r.table_id == table_id) {
            let mut index_columns = self
                .index_columns_meta
                .find(|r| r.index_id == index_record.index_id);
            index_columns.sort_by_key(|r| r.ordinal_position);
            let mut column_names = Vec::with_capacity(index_columns.len());
            for index_column in index_columns {
                if let Some(column) = self
                    .columns_meta
                    .find(|r| r.column_id == index_column.column_id)
                    .first()
                {
                    column_names.push(column.column_name.clone());
                }
            }
            result.push((index_record.clone(), column_names));
        }
        Ok(result)
    }

    /// The `tables` system table.
    pub fn tables_meta(&self) -> &SystemTable<TableRecord> {
        &self.tables_meta
    }

    /// The `columns` system table.
    pub fn columns_meta(&self) -> &SystemTable<ColumnRecord> {
        &self.columns_meta
    }

    /// The `indexes` system table.
    pub fn indexes_meta(&self) -> &SystemTable<IndexRecord> {
        &self.indexes_meta
    }

    /// The `index_columns` system table.
    pub fn index_columns_meta(&self) -> &SystemTable<IndexColumnRecord> {
        &self.index_columns_meta
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
