//! Engine entry point.

use tracing::debug;

use crate::catalog::Catalog;
use crate::executor::ExecutorNode;
use crate::plan::PlanNode;
use crate::planner::Planner;
use crate::sql;
use crate::storage::{Schema, Tuple};

use super::error::Error;

/// An in-memory database: a catalog plus the machinery to run SQL
/// statements against it.
pub struct Database {
    catalog: Catalog,
}

impl Database {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
        }
    }

    /// The catalog, for programmatic schema inspection.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutable catalog access, for DDL the SQL surface does not cover
    /// (index creation, table drops).
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Parses, plans, and executes one statement.
    pub fn execute(&mut self, query: &str) -> Result<ResultSet, Error> {
        debug!(query, "executing statement");
        let logical = sql::parse(query)?;
        self.execute_plan(logical)
    }

    /// Plans and executes an already-built logical plan.
    ///
    /// This is the entry for plan shapes the grammar cannot spell, such as
    /// aggregate expressions.
    pub fn execute_plan(&mut self, plan: PlanNode) -> Result<ResultSet, Error> {
        let physical = Planner::new(&self.catalog).create_plan(plan)?;
        let root = ExecutorNode::build(&physical);
        let rows = root.execute(&mut self.catalog)?;
        Ok(ResultSet::new(rows))
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows produced by one statement.
///
/// All rows share one output schema; a statement that produces no rows
/// has no schema.
#[derive(Debug)]
pub struct ResultSet {
    rows: Vec<Tuple>,
}

impl ResultSet {
    fn new(rows: Vec<Tuple>) -> Self {
        Self { rows }
    }

    /// The output rows.
    pub fn rows(&self) -> &[Tuple] {
        &self.rows
    }

    /// The shared output schema, or `None` when there are no rows.
    pub fn schema(&self) -> Option<&Schema> {
        self.rows.first().map(|t| t.schema())
    }

    /// Number of output rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the statement produced no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the result, yielding the rows.
    pub fn into_rows(self) -> Vec<Tuple> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use crate::datum::Value;

    use super::*;

    #[test]
    fn test_execute_create_insert_select() {
        let mut db = Database::new();
        assert!(db
            .execute("CREATE TABLE t (id INT, name VARCHAR)")
            .unwrap()
            .is_empty());
        assert!(db
            .execute("INSERT INTO t (id, name) VALUES (1, 'a')")
            .unwrap()
            .is_empty());
        let result = db.execute("SELECT * FROM t").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.rows()[0].fields(),
            &[Value::Integer(1), Value::from("a")]
        );
        assert_eq!(result.schema().unwrap().columns()[1].name, "name");
    }

    #[test]
    fn test_empty_result_has_no_schema() {
        let mut db = Database::new();
        db.execute("CREATE TABLE t (id INT)").unwrap();
        let result = db.execute("SELECT * FROM t").unwrap();
        assert!(result.is_empty());
        assert!(result.schema().is_none());
    }

    #[test]
    fn test_parse_error_surfaces() {
        let mut db = Database::new();
        let err = db.execute("SELEKT 1").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_plan_error_surfaces() {
        let mut db = Database::new();
        let err = db.execute("SELECT * FROM ghost").unwrap_err();
        assert!(matches!(err, Error::Plan(_)));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_execute_error_surfaces() {
        let mut db = Database::new();
        db.execute("CREATE TABLE t (id INT)").unwrap();
        let err = db.execute("SELECT ghost FROM t").unwrap_err();
        assert!(matches!(err, Error::Execute(_)));
    }
}
