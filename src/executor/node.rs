//! Executor operators.
//!
//! [`ExecutorNode`] is the enum-dispatched operator tree; this file holds
//! the read-side operators (select, filter, sort) and the dispatch glue.
//! The mutating operators live in `dml`, aggregation in `aggregate`.

use std::cmp::Ordering;
use std::ops::Bound;
use std::rc::Rc;

use tracing::debug;

use crate::catalog::Catalog;
use crate::datum::{DataType, Value};
use crate::plan::{CompareOp, PlanNode, Predicate};
use crate::storage::{BPlusIndex, DoubleKey, IndexKey, Rid, Schema, Table, Tuple};

use super::aggregate::AggregateExec;
use super::dml::{CreateTableExec, InsertExec};
use super::error::ExecutorError;

/// One executable operator per plan variant.
///
/// Enum dispatch instead of `dyn Trait`: the operator set is small and
/// fixed, and every call site stays monomorphic.
pub enum ExecutorNode<'a> {
    CreateTable(CreateTableExec<'a>),
    Insert(InsertExec<'a>),
    Select(SelectExec<'a>),
    Filter(FilterExec<'a>),
    Sort(SortExec<'a>),
    Aggregate(AggregateExec<'a>),
}

impl<'a> ExecutorNode<'a> {
    /// Builds the operator tree for a physical plan.
    ///
    /// Operators borrow their plan node; the plan must outlive the tree.
    pub fn build(plan: &'a PlanNode) -> Self {
        match plan {
            PlanNode::CreateTable { table, schema } => {
                ExecutorNode::CreateTable(CreateTableExec { table, schema })
            }
            PlanNode::Insert {
                table,
                columns,
                values,
            } => ExecutorNode::Insert(InsertExec {
                table,
                columns,
                values,
            }),
            PlanNode::Select { table, columns } => {
                ExecutorNode::Select(SelectExec { table, columns })
            }
            PlanNode::Filter {
                child,
                table,
                predicate,
                index,
                ..
            } => ExecutorNode::Filter(FilterExec {
                child: Box::new(Self::build(child)),
                table,
                predicate,
                index: index.as_deref(),
            }),
            PlanNode::Sort { child, columns } => ExecutorNode::Sort(SortExec {
                child: Box::new(Self::build(child)),
                columns,
            }),
            PlanNode::Aggregate {
                child,
                group_by,
                aggregates,
            } => ExecutorNode::Aggregate(AggregateExec {
                child: Box::new(Self::build(child)),
                group_by,
                aggregates,
            }),
        }
    }

    /// Runs the operator, materialising its entire output.
    pub fn execute(&self, catalog: &mut Catalog) -> Result<Vec<Tuple>, ExecutorError> {
        match self {
            ExecutorNode::CreateTable(op) => op.execute(catalog),
            ExecutorNode::Insert(op) => op.execute(catalog),
            ExecutorNode::Select(op) => op.execute(catalog),
            ExecutorNode::Filter(op) => op.execute(catalog),
            ExecutorNode::Sort(op) => op.execute(catalog),
            ExecutorNode::Aggregate(op) => op.execute(catalog),
        }
    }
}

/// Full scan with projection.
///
/// `*` expands to every column in schema order. Output rows appear in
/// ascending rid order, which is insertion order.
pub struct SelectExec<'a> {
    pub(super) table: &'a str,
    pub(super) columns: &'a [String],
}

impl SelectExec<'_> {
    pub(super) fn execute(&self, catalog: &mut Catalog) -> Result<Vec<Tuple>, ExecutorError> {
        let table = catalog.get_table(self.table)?;
        let schema = table.schema();

        let mut column_indexes = Vec::new();
        let mut selected = Vec::new();
        for name in self.columns {
            if name == "*" {
                for (i, column) in schema.columns().iter().enumerate() {
                    column_indexes.push(i);
                    selected.push(column.clone());
                }
                break;
            }
            let i = schema.index_of(name)?;
            column_indexes.push(i);
            selected.push(schema.columns()[i].clone());
        }

        let output_schema = Rc::new(Schema::new(selected));
        let mut rows = Vec::with_capacity(table.row_count());
        for rid in table.all_rids() {
            let tuple = table.get_tuple(rid)?;
            let fields = column_indexes
                .iter()
                .map(|&i| tuple.fields()[i].clone())
                .collect();
            rows.push(Tuple::new(Rc::clone(&output_schema), fields)?);
        }
        Ok(rows)
    }
}

/// Predicate filter with an index path and a scan path.
///
/// Both paths produce rows shaped like the child's output. The index path
/// fetches rids from the bound index and projects the base rows onto the
/// child's schema; the scan path evaluates the predicate against the child
/// rows directly, falling back to the base rows when the predicate column
/// was projected away.
pub struct FilterExec<'a> {
    pub(super) child: Box<ExecutorNode<'a>>,
    pub(super) table: &'a str,
    pub(super) predicate: &'a str,
    pub(super) index: Option<&'a str>,
}

impl FilterExec<'_> {
    pub(super) fn execute(&self, catalog: &mut Catalog) -> Result<Vec<Tuple>, ExecutorError> {
        let input = self.child.execute(catalog)?;
        let predicate = Predicate::parse(self.predicate)?;
        let table = catalog.get_table(self.table)?;
        let base_column = table.schema().index_of(&predicate.column)?;

        if let Some(index_name) = self.index {
            let rids = index_rids(table, index_name, &predicate)?;
            debug!(
                table = self.table,
                index = index_name,
                matches = rids.len(),
                "filter used index path"
            );
            let projection = child_projection(&input, table)?;
            let mut rows = Vec::with_capacity(rids.len());
            for rid in rids {
                rows.push(project(table.get_tuple(rid)?, &projection)?);
            }
            return Ok(rows);
        }

        let Some(first) = input.first() else {
            return Ok(Vec::new());
        };

        if let Ok(column_index) = first.schema().index_of(&predicate.column) {
            let mut rows = Vec::new();
            for tuple in input {
                if evaluate(&tuple.fields()[column_index], predicate.op, &predicate.value)? {
                    rows.push(tuple);
                }
            }
            return Ok(rows);
        }

        // the child projected the predicate column away; evaluate against
        // the base rows and shape the survivors like the child's output
        let projection = child_projection(&input, table)?;
        let mut rows = Vec::new();
        for rid in table.all_rids() {
            let tuple = table.get_tuple(rid)?;
            if evaluate(&tuple.fields()[base_column], predicate.op, &predicate.value)? {
                rows.push(project(tuple, &projection)?);
            }
        }
        Ok(rows)
    }
}

/// Mapping from a table's rows onto the child operator's output schema.
/// `None` means the shapes already agree.
type Projection = Option<(Rc<Schema>, Vec<usize>)>;

fn child_projection(input: &[Tuple], table: &Table) -> Result<Projection, ExecutorError> {
    let Some(first) = input.first() else {
        return Ok(None);
    };
    if first.schema() == table.schema() {
        return Ok(None);
    }
    let child_schema = first.schema_handle();
    let mut indexes = Vec::with_capacity(child_schema.len());
    for column in child_schema.columns() {
        indexes.push(table.schema().index_of(&column.name)?);
    }
    Ok(Some((child_schema, indexes)))
}

fn project(tuple: &Tuple, projection: &Projection) -> Result<Tuple, ExecutorError> {
    match projection {
        None => Ok(tuple.clone()),
        Some((schema, indexes)) => {
            let fields = indexes.iter().map(|&i| tuple.fields()[i].clone()).collect();
            Ok(Tuple::new(Rc::clone(schema), fields)?)
        }
    }
}

/// Evaluates `field <op> literal`.
///
/// Same-variant comparisons follow value ordering; strings support
/// equality only; a variant mismatch matches nothing.
fn evaluate(field: &Value, op: CompareOp, literal: &Value) -> Result<bool, ExecutorError> {
    if matches!(field, Value::Varchar(_))
        && matches!(literal, Value::Varchar(_))
        && op != CompareOp::Eq
    {
        return Err(ExecutorError::UnsupportedOperator {
            op: op.to_string(),
            data_type: DataType::Varchar,
        });
    }
    match field.compare(literal) {
        Some(ordering) => Ok(op.matches(ordering)),
        None => Ok(false),
    }
}

/// Resolves a predicate through the bound index, dispatching on the
/// literal's variant.
fn index_rids(
    table: &Table,
    index_name: &str,
    predicate: &Predicate,
) -> Result<Vec<Rid>, ExecutorError> {
    match &predicate.value {
        Value::Integer(n) => typed_index_rids(table.get_index::<i64>(index_name)?, predicate.op, *n),
        Value::Double(n) => typed_index_rids(
            table.get_index::<DoubleKey>(index_name)?,
            predicate.op,
            DoubleKey(*n),
        ),
        Value::Varchar(s) => match predicate.op {
            CompareOp::Eq => Ok(table.get_index::<String>(index_name)?.search(s)),
            op => Err(ExecutorError::UnsupportedOperator {
                op: op.to_string(),
                data_type: DataType::Varchar,
            }),
        },
    }
}

/// `=` is a point lookup; `>` and `<` are open-ended range scans that
/// exclude the boundary value.
fn typed_index_rids<K: IndexKey>(
    index: &BPlusIndex<K>,
    op: CompareOp,
    key: K,
) -> Result<Vec<Rid>, ExecutorError> {
    match op {
        CompareOp::Eq => Ok(index.search(&key)),
        CompareOp::Gt => Ok(index.range((Bound::Excluded(key), Bound::Unbounded))),
        CompareOp::Lt => Ok(index.range((Bound::Unbounded, Bound::Excluded(key)))),
        op => Err(ExecutorError::UnsupportedOperator {
            op: op.to_string(),
            data_type: K::DATA_TYPE,
        }),
    }
}

/// Ascending multi-column sort, primary column first.
///
/// The underlying sort is stable, so equal keys keep their input order and
/// repeated sorts of the same input agree.
pub struct SortExec<'a> {
    pub(super) child: Box<ExecutorNode<'a>>,
    pub(super) columns: &'a [String],
}

impl SortExec<'_> {
    pub(super) fn execute(&self, catalog: &mut Catalog) -> Result<Vec<Tuple>, ExecutorError> {
        let mut input = self.child.execute(catalog)?;
        let Some(first) = input.first() else {
            return Ok(input);
        };
        let mut key_indexes = Vec::with_capacity(self.columns.len());
        for name in self.columns {
            key_indexes.push(first.schema().index_of(name)?);
        }
        input.sort_by(|a, b| {
            for &i in &key_indexes {
                match a.fields()[i].compare(&b.fields()[i]) {
                    Some(Ordering::Equal) | None => continue,
                    Some(ordering) => return ordering,
                }
            }
            Ordering::Equal
        });
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{Column, Schema};

    use super::*;

    fn catalog_with_rows() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .create_table(
                "t",
                Schema::new(vec![
                    Column::new("id", DataType::Integer),
                    Column::new("name", DataType::Varchar),
                ]),
            )
            .unwrap();
        let table = catalog.get_table_mut("t").unwrap();
        for (id, name) in [(2, "b"), (1, "a"), (3, "c"), (2, "d")] {
            table
                .insert_tuple(vec![Value::Integer(id), Value::from(name)])
                .unwrap();
        }
        catalog
    }

    fn select(table: &str, columns: &[&str]) -> PlanNode {
        PlanNode::Select {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn filter(child: PlanNode, table: &str, predicate: &str, index: Option<&str>) -> PlanNode {
        let column = Predicate::parse(predicate).unwrap().column;
        PlanNode::Filter {
            child: Box::new(child),
            table: table.to_string(),
            column,
            predicate: predicate.to_string(),
            index: index.map(str::to_string),
        }
    }

    fn run(catalog: &mut Catalog, plan: &PlanNode) -> Vec<Tuple> {
        ExecutorNode::build(plan).execute(catalog).unwrap()
    }

    fn first_fields(rows: &[Tuple]) -> Vec<Value> {
        rows.iter().map(|t| t.fields()[0].clone()).collect()
    }

    #[test]
    fn test_select_star_expands_schema_order() {
        let mut catalog = catalog_with_rows();
        let rows = run(&mut catalog, &select("t", &["*"]));
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].schema().len(), 2);
        assert_eq!(rows[0].fields(), &[Value::Integer(2), Value::from("b")]);
    }

    #[test]
    fn test_select_projects_named_columns() {
        let mut catalog = catalog_with_rows();
        let rows = run(&mut catalog, &select("t", &["name"]));
        assert_eq!(rows[0].schema().columns()[0].name, "name");
        assert_eq!(
            first_fields(&rows),
            vec![
                Value::from("b"),
                Value::from("a"),
                Value::from("c"),
                Value::from("d")
            ]
        );
    }

    #[test]
    fn test_select_unknown_column_fails() {
        let mut catalog = catalog_with_rows();
        let err = ExecutorNode::build(&select("t", &["ghost"]))
            .execute(&mut catalog)
            .unwrap_err();
        assert!(matches!(err, ExecutorError::Storage(_)));
    }

    #[test]
    fn test_filter_scan_on_projected_column() {
        let mut catalog = catalog_with_rows();
        let plan = filter(select("t", &["id"]), "t", "id=2", None);
        let rows = run(&mut catalog, &plan);
        assert_eq!(first_fields(&rows), vec![Value::Integer(2), Value::Integer(2)]);
    }

    #[test]
    fn test_filter_scan_on_column_projected_away() {
        let mut catalog = catalog_with_rows();
        let plan = filter(select("t", &["name"]), "t", "id=2", None);
        let rows = run(&mut catalog, &plan);
        assert_eq!(rows[0].schema().columns()[0].name, "name");
        assert_eq!(first_fields(&rows), vec![Value::from("b"), Value::from("d")]);
    }

    #[test]
    fn test_filter_scan_supports_closed_ranges() {
        let mut catalog = catalog_with_rows();
        let plan = filter(select("t", &["*"]), "t", "id>=2", None);
        let rows = run(&mut catalog, &plan);
        assert_eq!(rows.len(), 3);
        let plan = filter(select("t", &["*"]), "t", "id<=1", None);
        let rows = run(&mut catalog, &plan);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_filter_string_equality_only() {
        let mut catalog = catalog_with_rows();
        let plan = filter(select("t", &["*"]), "t", "name='b'", None);
        let rows = run(&mut catalog, &plan);
        assert_eq!(rows.len(), 1);
        let plan = filter(select("t", &["*"]), "t", "name<'b'", None);
        let err = ExecutorNode::build(&plan).execute(&mut catalog).unwrap_err();
        assert!(matches!(err, ExecutorError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_filter_unknown_column_fails() {
        let mut catalog = catalog_with_rows();
        let plan = filter(select("t", &["*"]), "t", "ghost=1", None);
        let err = ExecutorNode::build(&plan).execute(&mut catalog).unwrap_err();
        assert!(matches!(err, ExecutorError::Storage(_)));
    }

    #[test]
    fn test_filter_index_path_excludes_boundary() {
        let mut catalog = catalog_with_rows();
        catalog.create_index::<i64>("idx_id", "t", 0, 2).unwrap();
        let plan = filter(select("t", &["*"]), "t", "id>2", Some("idx_id"));
        let rows = run(&mut catalog, &plan);
        assert_eq!(first_fields(&rows), vec![Value::Integer(3)]);
        let plan = filter(select("t", &["*"]), "t", "id<2", Some("idx_id"));
        let rows = run(&mut catalog, &plan);
        assert_eq!(first_fields(&rows), vec![Value::Integer(1)]);
    }

    #[test]
    fn test_filter_index_path_matches_scan_path() {
        let mut catalog = catalog_with_rows();
        catalog.create_index::<i64>("idx_id", "t", 0, 2).unwrap();
        for predicate in ["id=2", "id<3", "id>1"] {
            let scan = filter(select("t", &["*"]), "t", predicate, None);
            let indexed = filter(select("t", &["*"]), "t", predicate, Some("idx_id"));
            let mut scan_ids = first_fields(&run(&mut catalog, &scan));
            let mut index_ids = first_fields(&run(&mut catalog, &indexed));
            scan_ids.sort_by(|a, b| a.compare(b).unwrap());
            index_ids.sort_by(|a, b| a.compare(b).unwrap());
            assert_eq!(scan_ids, index_ids, "{predicate}");
        }
    }

    #[test]
    fn test_filter_index_path_projects_to_child_shape() {
        let mut catalog = catalog_with_rows();
        catalog.create_index::<i64>("idx_id", "t", 0, 2).unwrap();
        let plan = filter(select("t", &["name"]), "t", "id=2", Some("idx_id"));
        let rows = run(&mut catalog, &plan);
        assert_eq!(rows[0].schema().len(), 1);
        assert_eq!(first_fields(&rows), vec![Value::from("b"), Value::from("d")]);
    }

    #[test]
    fn test_sort_single_column() {
        let mut catalog = catalog_with_rows();
        let plan = PlanNode::Sort {
            child: Box::new(select("t", &["*"])),
            columns: vec!["id".to_string()],
        };
        let rows = run(&mut catalog, &plan);
        assert_eq!(
            first_fields(&rows),
            vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(2),
                Value::Integer(3)
            ]
        );
    }

    #[test]
    fn test_sort_multi_column_and_stability() {
        let mut catalog = catalog_with_rows();
        let plan = PlanNode::Sort {
            child: Box::new(select("t", &["*"])),
            columns: vec!["id".to_string(), "name".to_string()],
        };
        let rows = run(&mut catalog, &plan);
        let names: Vec<Value> = rows.iter().map(|t| t.fields()[1].clone()).collect();
        assert_eq!(
            names,
            vec![
                Value::from("a"),
                Value::from("b"),
                Value::from("d"),
                Value::from("c")
            ]
        );
        // repeated sorts of the same input agree
        let again = run(&mut catalog, &plan);
        let names_again: Vec<Value> = again.iter().map(|t| t.fields()[1].clone()).collect();
        assert_eq!(names, names_again);
    }

    #[test]
    fn test_sort_unknown_column_fails() {
        let mut catalog = catalog_with_rows();
        let plan = PlanNode::Sort {
            child: Box::new(select("t", &["name"])),
            columns: vec!["id".to_string()],
        };
        let err = ExecutorNode::build(&plan).execute(&mut catalog).unwrap_err();
        assert!(matches!(err, ExecutorError::Storage(_)));
    }

    #[test]
    fn test_sort_empty_input() {
        let mut catalog = Catalog::new();
        catalog
            .create_table("e", Schema::new(vec![Column::new("x", DataType::Integer)]))
            .unwrap();
        let plan = PlanNode::Sort {
            child: Box::new(select("e", &["*"])),
            columns: vec!["x".to_string()],
        };
        assert!(run(&mut catalog, &plan).is_empty());
    }
}
