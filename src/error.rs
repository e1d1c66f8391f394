use thiserror::Error;

use crate::block::AssemblyError;
use crate::capability::ImportError;
use crate::eval::EvalError;
use crate::parser::ParseError;

/// Crate-level error: everything that can fail a line.
#[derive(Error, Debug)]
pub enum Error {
    /// A non-control, non-import line missing its terminator.
    #[error("{0}")]
    Syntax(String),
    /// A line that classified cleanly but does not match the grammar.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// Misplaced `elif`/`else` and friends.
    #[error("{0}")]
    Assembly(#[from] AssemblyError),
    /// A facility failed to load.
    #[error("{0}")]
    Import(#[from] ImportError),
    /// A statement or block construct failed while evaluating.
    #[error("error executing statement '{statement}': {source}")]
    Execution {
        statement: String,
        #[source]
        source: EvalError,
    },
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InterpreterResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
