//! Mutating operators: CREATE TABLE and INSERT.
//!
//! Each performs exactly one catalog or table write, so a failure leaves
//! no partial effects behind.

use tracing::debug;

use crate::catalog::Catalog;
use crate::datum::Value;
use crate::storage::{Schema, Tuple};

use super::error::ExecutorError;

/// Creates a table in the catalog. Produces no rows.
pub struct CreateTableExec<'a> {
    pub(super) table: &'a str,
    pub(super) schema: &'a Schema,
}

impl CreateTableExec<'_> {
    pub(super) fn execute(&self, catalog: &mut Catalog) -> Result<Vec<Tuple>, ExecutorError> {
        catalog.create_table(self.table, self.schema.clone())?;
        Ok(Vec::new())
    }
}

/// Inserts one row. Produces no rows.
///
/// Each supplied value lands at its column's schema position. Columns the
/// statement does not mention are filled with the zero value of their
/// type; the engine does not track NULL or presence, so callers are
/// expected to supply every column.
pub struct InsertExec<'a> {
    pub(super) table: &'a str,
    pub(super) columns: &'a [String],
    pub(super) values: &'a [Value],
}

impl InsertExec<'_> {
    pub(super) fn execute(&self, catalog: &mut Catalog) -> Result<Vec<Tuple>, ExecutorError> {
        if self.columns.len() != self.values.len() {
            return Err(ExecutorError::ColumnValueCountMismatch {
                columns: self.columns.len(),
                values: self.values.len(),
            });
        }
        let table = catalog.get_table_mut(self.table)?;
        let schema = table.schema_handle();
        let mut fields: Vec<Value> = schema
            .columns()
            .iter()
            .map(|c| c.data_type.default_value())
            .collect();
        for (name, value) in self.columns.iter().zip(self.values) {
            let i = schema.index_of(name)?;
            fields[i] = value.clone();
        }
        let rid = table.insert_tuple(fields)?;
        debug!(table = self.table, rid, "inserted row");
        Ok(Vec::new())
    }
}
