//! # Run Driver
//!
//! Reads a program line by line and threads each line through
//! classification, parsing, block assembly, and execution. Per-line state
//! machine: blank and comment lines are skipped; an import directive
//! loads its facility immediately; control headers and statements flow
//! into the block assembler, and every construct the assembler closes is
//! executed on the spot. End of input flushes any still-open constructs.
//! The first failure stops the run and is reported with its line number.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::block::{BlockAssembler, ExecutableUnit};
use crate::classifier::{classify, indent_width, ClassifiedLine};
use crate::config::RuntimeConfig;
use crate::error::Error;
use crate::eval::{ExecutionContext, StatementEvaluator};
use crate::parser::{parse_header, parse_statement};

/// A run failure, as reported to the user.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Error on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Error,
    },
    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },
}

impl RuntimeError {
    fn line(line: usize, source: Error) -> Self {
        RuntimeError::Line { line, source }
    }
}

pub type RunResult = Result<(), RuntimeError>;

/// One interpreter session: the execution context plus the line-folding
/// state. Build one per run; the variable store and loaded facilities
/// live for its whole lifetime.
pub struct Interpreter {
    context: ExecutionContext,
    statement_evaluator: StatementEvaluator,
    assembler: BlockAssembler,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl Interpreter {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            context: ExecutionContext::new(&config),
            statement_evaluator: StatementEvaluator::new(),
            assembler: BlockAssembler::new(),
        }
    }

    /// The session's execution context.
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub async fn run_file(&mut self, path: &Path) -> RunResult {
        let source = std::fs::read_to_string(path).map_err(|e| RuntimeError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), "running program");
        self.run_source(&source).await
    }

    pub async fn run_source(&mut self, source: &str) -> RunResult {
        for (index, raw_line) in source.lines().enumerate() {
            self.process_line(index + 1, raw_line).await?;
        }
        let units = self.assembler.finish();
        self.execute_units(units).await
    }

    async fn process_line(&mut self, line: usize, raw_line: &str) -> RunResult {
        let indent = indent_width(raw_line);
        match classify(raw_line) {
            ClassifiedLine::Blank | ClassifiedLine::Comment => Ok(()),
            ClassifiedLine::SyntaxError(reason) => {
                Err(RuntimeError::line(line, Error::Syntax(reason)))
            }
            ClassifiedLine::ImportDirective(name) => {
                debug!(line, facility = %name, "import directive");
                self.context
                    .import_facility(&name)
                    .map_err(|e| RuntimeError::line(line, e.into()))?;
                Ok(())
            }
            ClassifiedLine::ControlHeader(text) => {
                let header =
                    parse_header(&text).map_err(|e| RuntimeError::line(line, e.into()))?;
                let units = self
                    .assembler
                    .feed_header(line, indent, &text, header)
                    .map_err(|e| RuntimeError::line(line, e.into()))?;
                self.execute_units(units).await
            }
            ClassifiedLine::Statement(body) => {
                let statement =
                    parse_statement(&body).map_err(|e| RuntimeError::line(line, e.into()))?;
                let units = self
                    .assembler
                    .feed_statement(line, indent, &body, statement)
                    .map_err(|e| RuntimeError::line(line, e.into()))?;
                self.execute_units(units).await
            }
        }
    }

    /// Execute closed constructs in source order. Failures carry the line
    /// the construct started on.
    async fn execute_units(&mut self, units: Vec<ExecutableUnit>) -> RunResult {
        for unit in units {
            debug!(line = unit.line, text = %unit.text, "executing");
            self.statement_evaluator
                .eval_statement(&unit.statement, &mut self.context)
                .await
                .map_err(|source| {
                    RuntimeError::line(
                        unit.line,
                        Error::Execution {
                            statement: unit.text.clone(),
                            source,
                        },
                    )
                })?;
        }
        Ok(())
    }
}
