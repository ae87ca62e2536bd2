//! SQL front end.
//!
//! Three layers: [`token`] defines the vocabulary, [`lexer`] turns query
//! text into tokens, and [`parser`] turns tokens into a logical
//! [`PlanNode`](crate::plan::PlanNode) tree for the planner.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{ParseError, Span};
pub use lexer::Lexer;
pub use parser::{parse, Parser};
