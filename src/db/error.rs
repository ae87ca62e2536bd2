//! Top-level statement execution errors.

use crate::executor::ExecutorError;
use crate::planner::PlannerError;
use crate::sql::ParseError;

/// Any failure while parsing, planning, or executing a statement.
#[derive(Debug)]
pub enum Error {
    /// The statement did not parse.
    Parse(ParseError),

    /// The plan referenced something that does not exist.
    Plan(PlannerError),

    /// Execution failed.
    Execute(ExecutorError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::Plan(e) => write!(f, "{}", e),
            Error::Execute(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Plan(e) => Some(e),
            Error::Execute(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<PlannerError> for Error {
    fn from(e: PlannerError) -> Self {
        Error::Plan(e)
    }
}

impl From<ExecutorError> for Error {
    fn from(e: ExecutorError) -> Self {
        Error::Execute(e)
    }
}
