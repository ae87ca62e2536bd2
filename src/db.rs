//! Database facade: the public entry point for embedding the engine.
//!
//! [`Database`] owns the catalog and wires the front end, planner, and
//! executor together behind a single `execute` call. The engine is
//! single-threaded and non-suspending: `execute` runs the statement to
//! completion or fails with an [`Error`], never partway.

mod database;
mod error;

pub use database::{Database, ResultSet};
pub use error::Error;
