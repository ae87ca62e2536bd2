//! SQL parser producing logical plan trees.
//!
//! The parser consumes the token stream and emits [`PlanNode`]s directly.
//! A SELECT becomes a Select leaf wrapped, innermost first, by Filter
//! (WHERE), Aggregate (GROUP BY, with an empty aggregate list — aggregate
//! expressions have no grammar surface and enter through the plan API),
//! and Sort (ORDER BY). The planner later validates references and binds
//! access paths.

use crate::datum::{DataType, Value};
use crate::plan::PlanNode;
use crate::storage::{Column, Schema};

use super::error::ParseError;
use super::lexer::Lexer;
use super::token::{Keyword, Token, TokenKind};

/// Parses one statement into a logical plan.
pub fn parse(query: &str) -> Result<PlanNode, ParseError> {
    Parser::new(query)?.parse()
}

/// Recursive-descent parser over a token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Tokenizes the input; lexing errors surface here.
    pub fn new(query: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(query).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Parses a single statement. A trailing semicolon is permitted; any
    /// other trailing input is an error.
    pub fn parse(&mut self) -> Result<PlanNode, ParseError> {
        let plan = match self.peek().kind.clone() {
            TokenKind::Keyword(Keyword::Select) => self.parse_select()?,
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert()?,
            TokenKind::Keyword(Keyword::Create) => self.parse_create_table()?,
            kind => {
                return Err(ParseError::unexpected_token(
                    "SELECT, INSERT or CREATE",
                    &kind.display_name(),
                    self.peek().span,
                ));
            }
        };
        self.accept(&TokenKind::Semicolon);
        let trailing = self.peek();
        if !trailing.is_eof() {
            return Err(ParseError::unexpected_token(
                "end of input",
                &trailing.kind.display_name(),
                trailing.span,
            ));
        }
        Ok(plan)
    }

    fn parse_select(&mut self) -> Result<PlanNode, ParseError> {
        self.expect_keyword(Keyword::Select)?;

        let mut columns = Vec::new();
        if self.accept(&TokenKind::Asterisk) {
            columns.push("*".to_string());
        } else {
            loop {
                columns.push(self.expect_identifier("column name")?);
                if !self.accept(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect_keyword(Keyword::From)?;
        let table = self.expect_identifier("table name")?;

        let mut plan = PlanNode::Select {
            table: table.clone(),
            columns,
        };

        if self.accept_keyword(Keyword::Where) {
            let column = self.expect_identifier("column name")?;
            let op = self.expect_compare_op()?;
            let literal = self.expect_literal_text()?;
            plan = PlanNode::Filter {
                child: Box::new(plan),
                table: table.clone(),
                column: column.clone(),
                predicate: format!("{column}{op}{literal}"),
                index: None,
            };
        }

        if self.accept_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            plan = PlanNode::Aggregate {
                child: Box::new(plan),
                group_by: self.identifier_list()?,
                aggregates: Vec::new(),
            };
        }

        if self.accept_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            plan = PlanNode::Sort {
                child: Box::new(plan),
                columns: self.identifier_list()?,
            };
        }

        Ok(plan)
    }

    fn parse_insert(&mut self) -> Result<PlanNode, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.expect_identifier("table name")?;

        self.expect(&TokenKind::LParen)?;
        let columns = self.identifier_list()?;
        self.expect(&TokenKind::RParen)?;

        self.expect_keyword(Keyword::Values)?;
        self.expect(&TokenKind::LParen)?;
        let mut values = Vec::new();
        loop {
            values.push(self.expect_literal_value()?);
            if !self.accept(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.peek().span;
        self.expect(&TokenKind::RParen)?;

        if columns.len() != values.len() {
            return Err(ParseError::new(
                format!(
                    "INSERT names {} columns but supplies {} values",
                    columns.len(),
                    values.len()
                ),
                close,
            ));
        }

        Ok(PlanNode::Insert {
            table,
            columns,
            values,
        })
    }

    fn parse_create_table(&mut self) -> Result<PlanNode, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.expect_identifier("table name")?;

        self.expect(&TokenKind::LParen)?;
        let mut columns = Vec::new();
        loop {
            let name = self.expect_identifier("column name")?;
            let data_type = self.expect_data_type()?;
            columns.push(Column::new(name, data_type));
            if !self.accept(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        Ok(PlanNode::CreateTable {
            table,
            schema: Schema::new(columns),
        })
    }

    fn identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = Vec::new();
        loop {
            names.push(self.expect_identifier("column name")?);
            if !self.accept(&TokenKind::Comma) {
                break;
            }
        }
        Ok(names)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    fn accept(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn accept_keyword(&mut self, keyword: Keyword) -> bool {
        self.accept(&TokenKind::Keyword(keyword))
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.accept(kind) {
            Ok(())
        } else {
            let found = self.peek();
            Err(ParseError::unexpected_token(
                &kind.display_name(),
                &found.kind.display_name(),
                found.span,
            ))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        self.expect(&TokenKind::Keyword(keyword))
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, ParseError> {
        let token = self.bump();
        match token.kind {
            TokenKind::Identifier(name) => Ok(name),
            kind => Err(ParseError::unexpected_token(
                what,
                &kind.display_name(),
                token.span,
            )),
        }
    }

    fn expect_compare_op(&mut self) -> Result<&'static str, ParseError> {
        let token = self.bump();
        match token.kind {
            TokenKind::Eq => Ok("="),
            TokenKind::Lt => Ok("<"),
            TokenKind::LtEq => Ok("<="),
            TokenKind::Gt => Ok(">"),
            TokenKind::GtEq => Ok(">="),
            kind => Err(ParseError::unexpected_token(
                "comparison operator",
                &kind.display_name(),
                token.span,
            )),
        }
    }

    /// A literal rendered back to predicate-string form. Quoted strings
    /// keep their quotes so the filter re-types them the same way; whole
    /// decimals keep a trailing `.0` so they stay decimals.
    fn expect_literal_text(&mut self) -> Result<String, ParseError> {
        let token = self.bump();
        match token.kind {
            TokenKind::Integer(n) => Ok(n.to_string()),
            TokenKind::Float(n) => {
                if n.fract() == 0.0 {
                    Ok(format!("{n:.1}"))
                } else {
                    Ok(n.to_string())
                }
            }
            TokenKind::String(s) => Ok(format!("'{s}'")),
            TokenKind::Identifier(s) => Ok(s),
            kind => Err(ParseError::unexpected_token(
                "literal",
                &kind.display_name(),
                token.span,
            )),
        }
    }

    /// A literal as a typed value. A bare identifier is a string.
    fn expect_literal_value(&mut self) -> Result<Value, ParseError> {
        let token = self.bump();
        match token.kind {
            TokenKind::Integer(n) => Ok(Value::Integer(n)),
            TokenKind::Float(n) => Ok(Value::Double(n)),
            TokenKind::String(s) => Ok(Value::Varchar(s)),
            TokenKind::Identifier(s) => Ok(Value::Varchar(s)),
            kind => Err(ParseError::unexpected_token(
                "literal",
                &kind.display_name(),
                token.span,
            )),
        }
    }

    fn expect_data_type(&mut self) -> Result<DataType, ParseError> {
        let token = self.bump();
        match token.kind {
            TokenKind::Keyword(Keyword::Int) | TokenKind::Keyword(Keyword::Integer) => {
                Ok(DataType::Integer)
            }
            TokenKind::Keyword(Keyword::Double) => Ok(DataType::Double),
            TokenKind::Keyword(Keyword::Varchar) => Ok(DataType::Varchar),
            kind => Err(ParseError::unexpected_token(
                "column type",
                &kind.display_name(),
                token.span,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table() {
        let plan = parse("CREATE TABLE t (id INT, name VARCHAR)").unwrap();
        let PlanNode::CreateTable { table, schema } = plan else {
            panic!("expected CreateTable");
        };
        assert_eq!(table, "t");
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.columns()[0].name, "id");
        assert_eq!(schema.columns()[0].data_type, DataType::Integer);
        assert_eq!(schema.columns()[1].data_type, DataType::Varchar);
    }

    #[test]
    fn test_create_table_type_spellings() {
        let plan = parse("create table t (a integer, b double, c varchar)").unwrap();
        let PlanNode::CreateTable { schema, .. } = plan else {
            panic!("expected CreateTable");
        };
        assert_eq!(schema.columns()[0].data_type, DataType::Integer);
        assert_eq!(schema.columns()[1].data_type, DataType::Double);
        assert_eq!(schema.columns()[2].data_type, DataType::Varchar);
    }

    #[test]
    fn test_insert() {
        let plan = parse("INSERT INTO t (id, name) VALUES (1, 'a')").unwrap();
        assert_eq!(
            plan,
            PlanNode::Insert {
                table: "t".to_string(),
                columns: vec!["id".to_string(), "name".to_string()],
                values: vec![Value::Integer(1), Value::Varchar("a".to_string())],
            }
        );
    }

    #[test]
    fn test_insert_literal_typing() {
        let plan = parse("INSERT INTO t (a, b, c, d) VALUES (-3, 2.5, 'x', bare)").unwrap();
        let PlanNode::Insert { values, .. } = plan else {
            panic!("expected Insert");
        };
        assert_eq!(
            values,
            vec![
                Value::Integer(-3),
                Value::Double(2.5),
                Value::Varchar("x".to_string()),
                Value::Varchar("bare".to_string()),
            ]
        );
    }

    #[test]
    fn test_insert_count_mismatch_fails() {
        let err = parse("INSERT INTO t (a, b) VALUES (1)").unwrap_err();
        assert!(err.message.contains("2 columns but supplies 1"));
    }

    #[test]
    fn test_select_star() {
        let plan = parse("SELECT * FROM t").unwrap();
        assert_eq!(
            plan,
            PlanNode::Select {
                table: "t".to_string(),
                columns: vec!["*".to_string()],
            }
        );
    }

    #[test]
    fn test_select_columns() {
        let plan = parse("SELECT id, name FROM t;").unwrap();
        assert_eq!(
            plan,
            PlanNode::Select {
                table: "t".to_string(),
                columns: vec!["id".to_string(), "name".to_string()],
            }
        );
    }

    #[test]
    fn test_select_where_builds_filter_over_select() {
        let plan = parse("SELECT name FROM t WHERE id = 2").unwrap();
        let PlanNode::Filter {
            child,
            table,
            column,
            predicate,
            index,
        } = plan
        else {
            panic!("expected Filter");
        };
        assert_eq!(table, "t");
        assert_eq!(column, "id");
        assert_eq!(predicate, "id=2");
        assert_eq!(index, None);
        assert!(matches!(*child, PlanNode::Select { .. }));
    }

    #[test]
    fn test_where_literal_renderings() {
        for (query, predicate) in [
            ("SELECT * FROM t WHERE a = 'x y'", "a='x y'"),
            ("SELECT * FROM t WHERE a >= 10", "a>=10"),
            ("SELECT * FROM t WHERE a < 2.5", "a<2.5"),
            ("SELECT * FROM t WHERE a > 3.0", "a>3.0"),
            ("SELECT * FROM t WHERE a = bare", "a=bare"),
        ] {
            let plan = parse(query).unwrap();
            let PlanNode::Filter { predicate: p, .. } = plan else {
                panic!("expected Filter for {query}");
            };
            assert_eq!(p, predicate, "{query}");
        }
    }

    #[test]
    fn test_select_group_by() {
        let plan = parse("SELECT k FROM g GROUP BY k").unwrap();
        let PlanNode::Aggregate {
            child,
            group_by,
            aggregates,
        } = plan
        else {
            panic!("expected Aggregate");
        };
        assert_eq!(group_by, vec!["k".to_string()]);
        assert!(aggregates.is_empty());
        assert!(matches!(*child, PlanNode::Select { .. }));
    }

    #[test]
    fn test_select_order_by() {
        let plan = parse("SELECT * FROM t ORDER BY name, id").unwrap();
        let PlanNode::Sort { child, columns } = plan else {
            panic!("expected Sort");
        };
        assert_eq!(columns, vec!["name".to_string(), "id".to_string()]);
        assert!(matches!(*child, PlanNode::Select { .. }));
    }

    #[test]
    fn test_full_select_nesting_order() {
        // Sort is outermost, then Aggregate, then Filter, then Select
        let plan = parse("SELECT x FROM s WHERE x > 3 GROUP BY x ORDER BY x").unwrap();
        let PlanNode::Sort { child, .. } = plan else {
            panic!("expected Sort at the root");
        };
        let PlanNode::Aggregate { child, .. } = *child else {
            panic!("expected Aggregate below Sort");
        };
        let PlanNode::Filter { child, .. } = *child else {
            panic!("expected Filter below Aggregate");
        };
        assert!(matches!(*child, PlanNode::Select { .. }));
    }

    #[test]
    fn test_unknown_statement_fails() {
        let err = parse("DELETE FROM t").unwrap_err();
        assert!(err.message.contains("SELECT, INSERT or CREATE"));
    }

    #[test]
    fn test_missing_from_fails() {
        let err = parse("SELECT id t").unwrap_err();
        assert!(err.message.contains("expected keyword 'FROM'"));
    }

    #[test]
    fn test_bad_column_type_fails() {
        let err = parse("CREATE TABLE t (id BLOB)").unwrap_err();
        assert!(err.message.contains("column type"));
    }

    #[test]
    fn test_trailing_garbage_fails() {
        let err = parse("SELECT * FROM t extra").unwrap_err();
        assert!(err.message.contains("end of input"));
    }

    #[test]
    fn test_empty_query_fails() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }
}
