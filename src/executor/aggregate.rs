//! Grouping and aggregate evaluation.
//!
//! Rows are grouped by the tuple of group-by column values; each group
//! runs one accumulator per aggregate expression. The output schema is the
//! group columns in declared order followed by one column per aggregate,
//! named `FUNC(col)`. Group order in the output is unspecified.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::catalog::Catalog;
use crate::datum::{DataType, Value};
use crate::plan::{AggregateFunction, AggregateOp};
use crate::storage::{Column, Schema, Tuple};

use super::error::ExecutorError;
use super::node::ExecutorNode;

/// Hash-grouping operator.
pub struct AggregateExec<'a> {
    pub(super) child: Box<ExecutorNode<'a>>,
    pub(super) group_by: &'a [String],
    pub(super) aggregates: &'a [AggregateOp],
}

impl AggregateExec<'_> {
    pub(super) fn execute(&self, catalog: &mut Catalog) -> Result<Vec<Tuple>, ExecutorError> {
        let input = self.child.execute(catalog)?;

        if input.is_empty() {
            // no groups can form; without group-by columns the aggregates
            // still produce their single neutral row
            if self.group_by.is_empty() && !self.aggregates.is_empty() {
                return self.neutral_row();
            }
            return Ok(Vec::new());
        }

        let input_schema = input[0].schema_handle();
        let mut group_indexes = Vec::with_capacity(self.group_by.len());
        for name in self.group_by {
            group_indexes.push(input_schema.index_of(name)?);
        }
        let mut agg_indexes = Vec::with_capacity(self.aggregates.len());
        for op in self.aggregates {
            agg_indexes.push(input_schema.index_of(&op.column)?);
        }

        let output_schema = self.output_schema(&input_schema)?;

        let mut groups: HashMap<GroupKey, Vec<&Tuple>> = HashMap::new();
        for tuple in &input {
            let key = GroupKey(
                group_indexes
                    .iter()
                    .map(|&i| tuple.fields()[i].clone())
                    .collect(),
            );
            groups.entry(key).or_default().push(tuple);
        }

        let mut rows = Vec::with_capacity(groups.len());
        for (key, members) in groups {
            let mut fields = key.0;
            for (op, &column_index) in self.aggregates.iter().zip(&agg_indexes) {
                let mut accumulator = Accumulator::new(op.function);
                for tuple in &members {
                    accumulator.feed(&tuple.fields()[column_index])?;
                }
                fields.push(accumulator.finish());
            }
            rows.push(Tuple::new(Rc::clone(&output_schema), fields)?);
        }
        Ok(rows)
    }

    fn output_schema(&self, input_schema: &Schema) -> Result<Rc<Schema>, ExecutorError> {
        let mut columns = Vec::with_capacity(self.group_by.len() + self.aggregates.len());
        for name in self.group_by {
            let i = input_schema.index_of(name)?;
            columns.push(input_schema.columns()[i].clone());
        }
        for op in self.aggregates {
            columns.push(Column::new(op.output_name(), op.output_type()));
        }
        Ok(Rc::new(Schema::new(columns)))
    }

    /// One row of zero aggregates: `COUNT = 0`, `SUM = 0.0`, `AVG = 0.0`.
    fn neutral_row(&self) -> Result<Vec<Tuple>, ExecutorError> {
        let columns = self
            .aggregates
            .iter()
            .map(|op| Column::new(op.output_name(), op.output_type()))
            .collect();
        let schema = Rc::new(Schema::new(columns));
        let fields = self
            .aggregates
            .iter()
            .map(|op| Accumulator::new(op.function).finish())
            .collect();
        Ok(vec![Tuple::new(schema, fields)?])
    }
}

/// Running state for one aggregate over one group.
enum Accumulator {
    Count { rows: i64 },
    Sum { total: f64 },
    Avg { total: f64, rows: i64 },
}

impl Accumulator {
    fn new(function: AggregateFunction) -> Self {
        match function {
            AggregateFunction::Count => Accumulator::Count { rows: 0 },
            AggregateFunction::Sum => Accumulator::Sum { total: 0.0 },
            AggregateFunction::Avg => Accumulator::Avg {
                total: 0.0,
                rows: 0,
            },
        }
    }

    /// Folds one input value in. SUM and AVG accept numeric inputs only;
    /// integers are widened to doubles.
    fn feed(&mut self, value: &Value) -> Result<(), ExecutorError> {
        match self {
            Accumulator::Count { rows } => {
                *rows += 1;
                Ok(())
            }
            Accumulator::Sum { total } => {
                *total += numeric(value)?;
                Ok(())
            }
            Accumulator::Avg { total, rows } => {
                *total += numeric(value)?;
                *rows += 1;
                Ok(())
            }
        }
    }

    /// Final value; with no input this is the zero of the function.
    fn finish(&self) -> Value {
        match self {
            Accumulator::Count { rows } => Value::Integer(*rows),
            Accumulator::Sum { total } => Value::Double(*total),
            Accumulator::Avg { total, rows } => {
                if *rows == 0 {
                    Value::Double(0.0)
                } else {
                    Value::Double(total / *rows as f64)
                }
            }
        }
    }
}

fn numeric(value: &Value) -> Result<f64, ExecutorError> {
    match value {
        Value::Integer(n) => Ok(*n as f64),
        Value::Double(n) => Ok(*n),
        Value::Varchar(_) => Err(ExecutorError::AggregateTypeMismatch {
            expected: "numeric",
            found: DataType::Varchar,
        }),
    }
}

/// Grouping key over a row's group-by values.
///
/// Doubles compare by `total_cmp` and hash by `to_bits`, so keys that
/// compare equal always hash equally.
#[derive(Debug)]
struct GroupKey(Vec<Value>);

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(&other.0).all(|(a, b)| match (a, b) {
                (Value::Double(x), Value::Double(y)) => {
                    x.total_cmp(y) == std::cmp::Ordering::Equal
                }
                _ => a == b,
            })
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for value in &self.0 {
            match value {
                Value::Integer(n) => {
                    0u8.hash(state);
                    n.hash(state);
                }
                Value::Double(n) => {
                    1u8.hash(state);
                    n.to_bits().hash(state);
                }
                Value::Varchar(s) => {
                    2u8.hash(state);
                    s.hash(state);
                }
            }
        }
    }
}
