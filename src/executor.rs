//! Query executor.
//!
//! Each plan variant maps to one operator, composed into a tree mirroring
//! the physical plan. Evaluation is single-shot and fully materialised:
//! `execute` returns the operator's entire output, and a parent consumes
//! its child's whole result before producing its own. There is no
//! pipelining, no iteration state, and no suspension; a statement is one
//! synchronous pull through the tree.

mod aggregate;
mod dml;
mod error;
mod node;

pub use error::ExecutorError;
pub use node::ExecutorNode;
