//! Query planner: logical plan in, physical plan out.
//!
//! The planner walks the logical tree, validates table references, and
//! re-emits the tree unchanged in shape. The one enrichment is on Filter
//! nodes: when the table has an index whose column list is exactly the
//! filter column and the operator is `=`, `<`, or `>`, the filter is bound
//! to that index. `<=` and `>=` are never index-bound and always scan.

use tracing::debug;

use crate::catalog::{Catalog, CatalogError};
use crate::plan::{PlanNode, Predicate, PredicateError};

/// Errors from plan validation.
#[derive(Debug)]
pub enum PlannerError {
    /// Referenced table does not exist.
    TableNotFound { name: String },

    /// Malformed filter predicate.
    Predicate(PredicateError),

    /// Catalog lookup failed.
    Catalog(CatalogError),
}

impl std::fmt::Display for PlannerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlannerError::TableNotFound { name } => {
                write!(f, "table \"{}\" does not exist", name)
            }
            PlannerError::Predicate(e) => write!(f, "{}", e),
            PlannerError::Catalog(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::Predicate(e) => Some(e),
            PlannerError::Catalog(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PredicateError> for PlannerError {
    fn from(e: PredicateError) -> Self {
        PlannerError::Predicate(e)
    }
}

impl From<CatalogError> for PlannerError {
    fn from(e: CatalogError) -> Self {
        PlannerError::Catalog(e)
    }
}

/// Plans logical trees against a catalog.
pub struct Planner<'a> {
    catalog: &'a Catalog,
}

impl<'a> Planner<'a> {
    /// Creates a planner over the given catalog.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Produces the physical plan for a logical plan.
    pub fn create_plan(&self, plan: PlanNode) -> Result<PlanNode, PlannerError> {
        match plan {
            // the create is the point; no catalog check
            node @ PlanNode::CreateTable { .. } => Ok(node),
            PlanNode::Select { table, columns } => {
                self.check_table(&table)?;
                Ok(PlanNode::Select { table, columns })
            }
            PlanNode::Insert {
                table,
                columns,
                values,
            } => {
                self.check_table(&table)?;
                Ok(PlanNode::Insert {
                    table,
                    columns,
                    values,
                })
            }
            PlanNode::Filter {
                child,
                table,
                column,
                predicate,
                ..
            } => {
                let child = Box::new(self.create_plan(*child)?);
                let op = Predicate::parse(&predicate)?.op;
                let index = if op.index_eligible() {
                    self.index_for_column(&table, &column)?
                } else {
                    None
                };
                if let Some(name) = &index {
                    debug!(table = %table, column = %column, index = %name, "filter bound to index");
                }
                Ok(PlanNode::Filter {
                    child,
                    table,
                    column,
                    predicate,
                    index,
                })
            }
            PlanNode::Sort { child, columns } => {
                let child = Box::new(self.create_plan(*child)?);
                Ok(PlanNode::Sort { child, columns })
            }
            PlanNode::Aggregate {
                child,
                group_by,
                aggregates,
            } => {
                let child = Box::new(self.create_plan(*child)?);
                Ok(PlanNode::Aggregate {
                    child,
                    group_by,
                    aggregates,
                })
            }
        }
    }

    fn check_table(&self, name: &str) -> Result<(), PlannerError> {
        if self.catalog.has_table(name) {
            Ok(())
        } else {
            Err(PlannerError::TableNotFound {
                name: name.to_string(),
            })
        }
    }

    /// Finds an index whose column list is exactly the given column.
    fn index_for_column(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Option<String>, PlannerError> {
        for (record, columns) in self.catalog.get_indexes_for_table(table)? {
            if columns.len() == 1 && columns[0] == column {
                return Ok(Some(record.index_name));
            }
        }
        Ok(None)
    }
}
