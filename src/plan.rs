//! Logical and physical plan trees.
//!
//! A plan is a small sum type. The SQL parser produces the logical form;
//! the planner re-emits it with access paths filled in (a Filter node's
//! `index` binding). Filter, Sort, and Aggregate have exactly one child;
//! the remaining variants are leaves. Plan nodes live for the duration of
//! a single statement.

use std::cmp::Ordering;
use std::fmt;

use crate::datum::{DataType, Value};
use crate::storage::Schema;

/// A node in a query plan tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
    /// Scan a table, projecting the named columns (`*` selects all).
    Select {
        table: String,
        columns: Vec<String>,
    },
    /// Insert one row built from column/value pairs.
    Insert {
        table: String,
        columns: Vec<String>,
        values: Vec<Value>,
    },
    /// Keep the rows satisfying a predicate over `column`. `index` is the
    /// access path chosen by the planner; `None` means full scan.
    Filter {
        child: Box<PlanNode>,
        table: String,
        column: String,
        predicate: String,
        index: Option<String>,
    },
    /// Sort child rows ascending by the named columns, primary first.
    Sort {
        child: Box<PlanNode>,
        columns: Vec<String>,
    },
    /// Group child rows by the named columns and evaluate one aggregate
    /// expression per [`AggregateOp`] for each group.
    Aggregate {
        child: Box<PlanNode>,
        group_by: Vec<String>,
        aggregates: Vec<AggregateOp>,
    },
    /// Create a table with the given schema.
    CreateTable { table: String, schema: Schema },
}

/// Supported aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Sum,
    Count,
    Avg,
}

impl AggregateFunction {
    /// Returns the SQL spelling of this function.
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Avg => "AVG",
        }
    }

    /// Output type: COUNT produces an integer, SUM and AVG accumulate as
    /// doubles regardless of the input variant.
    pub fn output_type(&self) -> DataType {
        match self {
            AggregateFunction::Count => DataType::Integer,
            AggregateFunction::Sum | AggregateFunction::Avg => DataType::Double,
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aggregate expression over a named input column.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOp {
    pub function: AggregateFunction,
    pub column: String,
}

impl AggregateOp {
    /// Creates an aggregate expression.
    pub fn new(function: AggregateFunction, column: impl Into<String>) -> Self {
        Self {
            function,
            column: column.into(),
        }
    }

    /// Output column name, e.g. `SUM(v)`.
    pub fn output_name(&self) -> String {
        format!("{}({})", self.function, self.column)
    }

    /// Output column type.
    pub fn output_type(&self) -> DataType {
        self.function.output_type()
    }
}

/// Comparison operator of a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CompareOp {
    /// Returns the operator's SQL spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }

    /// Whether an index can serve this operator. `<=` and `>=` always fall
    /// back to a full scan.
    pub fn index_eligible(&self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Lt | CompareOp::Gt)
    }

    /// Applies the operator to a comparison outcome.
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A malformed predicate string.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateError {
    pub text: String,
}

impl fmt::Display for PredicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid predicate: \"{}\"", self.text)
    }
}

impl std::error::Error for PredicateError {}

/// A parsed filter predicate of the form `<column><op><literal>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Predicate {
    /// Parses `<column><op><literal>`, tolerating whitespace around the
    /// operator. The literal is typed by precedence: quoted string,
    /// integer, decimal, bare string.
    pub fn parse(text: &str) -> Result<Self, PredicateError> {
        // two-character operators first so "<=" is not read as "<"
        const OPS: [(&str, CompareOp); 5] = [
            ("<=", CompareOp::Le),
            (">=", CompareOp::Ge),
            ("=", CompareOp::Eq),
            ("<", CompareOp::Lt),
            (">", CompareOp::Gt),
        ];
        for (symbol, op) in OPS {
            if let Some(at) = text.find(symbol) {
                let column = text[..at].trim();
                let literal = text[at + symbol.len()..].trim();
                if column.is_empty() || literal.is_empty() {
                    return Err(PredicateError {
                        text: text.to_string(),
                    });
                }
                return Ok(Self {
                    column: column.to_string(),
                    op,
                    value: parse_literal(literal),
                });
            }
        }
        Err(PredicateError {
            text: text.to_string(),
        })
    }
}

/// Types a predicate literal.
fn parse_literal(text: &str) -> Value {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        return Value::Varchar(text[1..text.len() - 1].to_string());
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::Integer(n);
    }
    if let Ok(n) = text.parse::<f64>() {
        return Value::Double(n);
    }
    Value::Varchar(text.to_string())
}
