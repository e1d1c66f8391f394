//! # RedCode Interpreter
//!
//! A line-oriented interpreter for the RedCode surface language (`.red`
//! files). Programs are UTF-8 text, one statement per physical line:
//! ordinary statements end with `;`, control headers (`if`, `while`,
//! `for`, ...) introduce indented blocks, and `redexternal <facility>;`
//! extends the environment with generated capability wrappers around an
//! external facility.
//!
//! ## Pipeline
//!
//! ```text
//! Source line → Classifier → Parser → Block Assembler → Evaluator
//!                                ↘ (import directives) Capability Registry
//! ```
//!
//! ### Classification
//!
//! The [`classifier`] decides, per raw line, between blank/comment,
//! import directive, control header, and terminated statement, using only
//! lexical cues — a missing `;` on an ordinary line is the one syntax
//! error at this stage.
//!
//! ### Parsing and assembly
//!
//! The [`parser`] turns statement bodies and header lines into [`ast`]
//! nodes; the [`block`] assembler folds headers and their indented bodies
//! into nested constructs, emitting each completed construct for
//! execution.
//!
//! ### Capabilities
//!
//! The [`capability`] registry owns everything callable: [`builtins`] are
//! registered by explicit enumeration at startup, and importing a
//! facility synthesizes uniformly-shaped wrappers for its allow-listed
//! operations, each wrapped in one of four error-normalization policies.
//! Wrapped names are deterministic: the `red` prefix plus the bare
//! operation name (`redexternal time;` publishes `redsleep`).
//!
//! ### Evaluation
//!
//! The [`eval`] module executes statements against the
//! [`eval::ExecutionContext`]: the persistent variable store layered over
//! the registry's published entries. Bindings written by one statement
//! are visible to the next; the store is never reset during a run.
//!
//! ## Failure model
//!
//! Network, structured-data and generic capability failures degrade to
//! in-band `{"error": ...}` values. Everything else — syntax, parse,
//! import, evaluation — aborts the run with a single `Error on line N`
//! diagnostic and a non-zero exit.

pub mod ast;
pub mod block;
pub mod builtins;
pub mod capability;
pub mod classifier;
pub mod config;
pub mod error;
pub mod eval;
pub mod parser;
pub mod runtime;
pub mod value;

// Re-exports
pub use config::RuntimeConfig;
pub use error::{Error, InterpreterResult};
pub use runtime::{Interpreter, RunResult, RuntimeError};
pub use value::Value;
