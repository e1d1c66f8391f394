//! # Evaluation System
//!
//! Executes parsed statements against the execution context. The
//! [`context::ExecutionContext`] realizes the execution namespace: the
//! variable store layered over the capability registry's published
//! entries. The [`expression::ExpressionEvaluator`] and
//! [`statement::StatementEvaluator`] walk the AST; every new or mutated
//! binding lands directly in the persistent variable store, so the
//! write-back contract holds by construction.

pub mod context;
pub mod expression;
pub mod statement;

use thiserror::Error;

use crate::capability::CallError;

/// Evaluation failure. Folded into a line-scoped execution failure by the
/// run driver; never reported raw.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("name '{0}' is not defined")]
    UndefinedVariable(String),
    #[error("{0} value is not callable")]
    NotCallable(&'static str),
    #[error("unsupported operand types: {0}")]
    InvalidOperation(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("list index out of range: {0}")]
    IndexOutOfRange(i64),
    #[error("key not found: {0:?}")]
    KeyNotFound(String),
    #[error("{0} value is not indexable")]
    NotIndexable(&'static str),
    #[error("{0} value is not iterable")]
    NotIterable(&'static str),
    #[error("maximum loop iterations exceeded ({0})")]
    MaxIterations(u64),
    /// A native call failed and no policy absorbed it (built-ins and
    /// passthrough-wrapped capabilities).
    #[error("{0}")]
    Call(#[from] CallError),
}

pub type EvalResult<T> = Result<T, EvalError>;

pub use context::ExecutionContext;
pub use expression::ExpressionEvaluator;
pub use statement::StatementEvaluator;
