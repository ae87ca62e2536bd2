//! Rows and row identifiers.

use std::rc::Rc;

use crate::datum::Value;

use super::error::StorageError;
use super::schema::Schema;

/// Identifies a row within its table for the table's lifetime.
///
/// Rids are allocated monotonically starting at zero and are never reused,
/// so deleting a row does not disturb any other row's identity.
pub type Rid = u64;

/// An immutable row: a shared schema handle plus one value per column.
///
/// The schema handle is non-owning in spirit: the table (or the operator
/// that derived the row) holds the authoritative schema, and every row it
/// produces shares that one allocation.
#[derive(Debug, Clone)]
pub struct Tuple {
    schema: Rc<Schema>,
    fields: Vec<Value>,
}

impl Tuple {
    /// Builds a tuple, validating the fields against the schema.
    ///
    /// # Errors
    ///
    /// Returns `FieldCountMismatch` if the field count differs from the
    /// schema's column count, or `TypeMismatch` if any field's variant does
    /// not match its column's declared type.
    pub fn new(schema: Rc<Schema>, fields: Vec<Value>) -> Result<Self, StorageError> {
        if fields.len() != schema.len() {
            return Err(StorageError::FieldCountMismatch {
                expected: schema.len(),
                found: fields.len(),
            });
        }
        for (column, field) in schema.columns().iter().zip(&fields) {
            if !field.conforms_to(column.data_type) {
                return Err(StorageError::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.data_type,
                    found: field.data_type(),
                });
            }
        }
        Ok(Self { schema, fields })
    }

    /// The schema this row conforms to.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// A shared handle to this row's schema.
    pub fn schema_handle(&self) -> Rc<Schema> {
        Rc::clone(&self.schema)
    }

    /// All field values in column order.
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Returns the field at `index`.
    pub fn field(&self, index: usize) -> Result<&Value, StorageError> {
        self.fields
            .get(index)
            .ok_or(StorageError::ColumnIndexOutOfRange {
                index,
                count: self.fields.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::datum::DataType;
    use crate::storage::schema::Column;

    use super::*;

    fn sample_schema() -> Rc<Schema> {
        Rc::new(Schema::new(vec![
            Column::new("id", DataType::Integer),
            Column::new("name", DataType::Varchar),
        ]))
    }

    #[test]
    fn test_valid_tuple() {
        let tuple = Tuple::new(sample_schema(), vec![Value::Integer(1), Value::from("a")]).unwrap();
        assert_eq!(tuple.fields().len(), 2);
        assert_eq!(tuple.field(0).unwrap(), &Value::Integer(1));
        assert_eq!(tuple.schema().len(), 2);
    }

    #[test]
    fn test_field_count_mismatch() {
        let err = Tuple::new(sample_schema(), vec![Value::Integer(1)]).unwrap_err();
        assert_eq!(
            err,
            StorageError::FieldCountMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_field_type_mismatch() {
        let err =
            Tuple::new(sample_schema(), vec![Value::from("one"), Value::from("a")]).unwrap_err();
        assert_eq!(
            err,
            StorageError::TypeMismatch {
                column: "id".to_string(),
                expected: DataType::Integer,
                found: DataType::Varchar,
            }
        );
    }

    #[test]
    fn test_field_out_of_range() {
        let tuple = Tuple::new(sample_schema(), vec![Value::Integer(1), Value::from("a")]).unwrap();
        assert_eq!(
            tuple.field(2),
            Err(StorageError::ColumnIndexOutOfRange { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_rows_share_schema_allocation() {
        let schema = sample_schema();
        let a = Tuple::new(Rc::clone(&schema), vec![Value::Integer(1), Value::from("a")]).unwrap();
        let b = Tuple::new(Rc::clone(&schema), vec![Value::Integer(2), Value::from("b")]).unwrap();
        assert!(Rc::ptr_eq(&a.schema_handle(), &b.schema_handle()));
    }
}
