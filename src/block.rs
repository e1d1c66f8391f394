//! # Block Assembly
//!
//! Control headers introduce indented bodies on subsequent lines. The
//! assembler folds the per-line stream of headers and simple statements
//! into nested block constructs: a header opens a frame, deeper lines fill
//! it, and a line at or left of the header's indentation closes it. A
//! closed construct either becomes part of its parent frame's body or is
//! emitted as an executable unit.
//!
//! `elif`/`else` lines at the same indentation extend the open `if` frame
//! instead of closing it. A header directly followed by a dedent closes
//! with an empty body, which is legal and evaluates as a no-op.

use thiserror::Error;

use crate::ast::{Expression, Header, Statement};

/// A top-level statement ready for execution, tagged with the source line
/// it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableUnit {
    pub line: usize,
    pub text: String,
    pub statement: Statement,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("'{0}' without a matching 'if'")]
    DanglingBranch(&'static str),
    #[error("'elif' after 'else'")]
    BranchAfterElse,
    #[error("duplicate 'else'")]
    DuplicateElse,
}

enum Construct {
    If {
        branches: Vec<(Expression, Vec<Statement>)>,
        else_block: Option<Vec<Statement>>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    For {
        variable: String,
        iterable: Expression,
        body: Vec<Statement>,
    },
}

impl Construct {
    fn open(header: Header) -> Self {
        match header {
            Header::If(condition) => Construct::If {
                branches: vec![(condition, Vec::new())],
                else_block: None,
            },
            Header::While(condition) => Construct::While {
                condition,
                body: Vec::new(),
            },
            Header::For { variable, iterable } => Construct::For {
                variable,
                iterable,
                body: Vec::new(),
            },
            // attachment headers never open a frame
            Header::Elif(_) | Header::Else => unreachable!("attachment header opened a frame"),
        }
    }

    /// Append a statement to the construct's current body.
    fn push(&mut self, statement: Statement) {
        match self {
            Construct::If {
                branches,
                else_block,
            } => match else_block {
                Some(body) => body.push(statement),
                None => match branches.last_mut() {
                    Some((_, body)) => body.push(statement),
                    None => unreachable!("if construct has at least one branch"),
                },
            },
            Construct::While { body, .. } | Construct::For { body, .. } => body.push(statement),
        }
    }

    fn into_statement(self) -> Statement {
        match self {
            Construct::If {
                branches,
                else_block,
            } => Statement::If {
                branches,
                else_block,
            },
            Construct::While { condition, body } => Statement::While { condition, body },
            Construct::For {
                variable,
                iterable,
                body,
            } => Statement::For {
                variable,
                iterable,
                body,
            },
        }
    }
}

struct Frame {
    indent: usize,
    line: usize,
    text: String,
    construct: Construct,
}

/// Folds the classified line stream into executable units.
#[derive(Default)]
pub struct BlockAssembler {
    frames: Vec<Frame>,
}

impl BlockAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while at least one block construct is still open.
    pub fn in_block(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Feed a simple statement. Returns any constructs this line closed,
    /// followed by the statement itself when it is top-level.
    pub fn feed_statement(
        &mut self,
        line: usize,
        indent: usize,
        text: &str,
        statement: Statement,
    ) -> Result<Vec<ExecutableUnit>, AssemblyError> {
        let mut out = self.close_frames(indent, false);
        match self.frames.last_mut() {
            Some(frame) => frame.construct.push(statement),
            None => out.push(ExecutableUnit {
                line,
                text: text.to_string(),
                statement,
            }),
        }
        Ok(out)
    }

    /// Feed a control header. Opening headers push a frame;
    /// `elif`/`else` extend the `if` frame at the same indentation.
    pub fn feed_header(
        &mut self,
        line: usize,
        indent: usize,
        text: &str,
        header: Header,
    ) -> Result<Vec<ExecutableUnit>, AssemblyError> {
        match header {
            Header::Elif(condition) => {
                let out = self.close_frames(indent, true);
                let construct = self.branch_target(indent, "elif")?;
                let Construct::If {
                    branches,
                    else_block,
                } = construct
                else {
                    return Err(AssemblyError::DanglingBranch("elif"));
                };
                if else_block.is_some() {
                    return Err(AssemblyError::BranchAfterElse);
                }
                branches.push((condition, Vec::new()));
                Ok(out)
            }
            Header::Else => {
                let out = self.close_frames(indent, true);
                let construct = self.branch_target(indent, "else")?;
                let Construct::If { else_block, .. } = construct else {
                    return Err(AssemblyError::DanglingBranch("else"));
                };
                if else_block.is_some() {
                    return Err(AssemblyError::DuplicateElse);
                }
                *else_block = Some(Vec::new());
                Ok(out)
            }
            opening => {
                let out = self.close_frames(indent, false);
                self.frames.push(Frame {
                    indent,
                    line,
                    text: text.to_string(),
                    construct: Construct::open(opening),
                });
                Ok(out)
            }
        }
    }

    /// Close every remaining frame at end of input.
    pub fn finish(&mut self) -> Vec<ExecutableUnit> {
        self.close_frames(0, false)
    }

    /// The `if` frame an `elif`/`else` at `indent` extends.
    fn branch_target(
        &mut self,
        indent: usize,
        keyword: &'static str,
    ) -> Result<&mut Construct, AssemblyError> {
        match self.frames.last_mut() {
            Some(frame) if frame.indent == indent => Ok(&mut frame.construct),
            _ => Err(AssemblyError::DanglingBranch(keyword)),
        }
    }

    /// Close frames the current line dedents past. With `exclusive`, a
    /// frame at exactly `indent` stays open (for branch attachment).
    fn close_frames(&mut self, indent: usize, exclusive: bool) -> Vec<ExecutableUnit> {
        let mut out = Vec::new();
        while let Some(top) = self.frames.last() {
            let closes = if exclusive {
                top.indent > indent
            } else {
                top.indent >= indent
            };
            if !closes {
                break;
            }
            let frame = self.frames.pop().expect("frame stack is non-empty");
            let statement = frame.construct.into_statement();
            match self.frames.last_mut() {
                Some(parent) => parent.construct.push(statement),
                None => out.push(ExecutableUnit {
                    line: frame.line,
                    text: frame.text,
                    statement,
                }),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;
    use crate::parser::{parse_header, parse_statement};

    /// Drive the assembler with (indent, line-text) pairs the way the run
    /// driver would.
    fn assemble(lines: &[(usize, &str)]) -> Vec<ExecutableUnit> {
        let mut assembler = BlockAssembler::new();
        let mut out = Vec::new();
        for (number, (indent, text)) in lines.iter().enumerate() {
            let units = if text.ends_with(':') {
                assembler
                    .feed_header(number + 1, *indent, text, parse_header(text).unwrap())
                    .unwrap()
            } else {
                assembler
                    .feed_statement(number + 1, *indent, text, parse_statement(text).unwrap())
                    .unwrap()
            };
            out.extend(units);
        }
        out.extend(assembler.finish());
        out
    }

    #[test]
    fn test_top_level_statement_passes_through() {
        let units = assemble(&[(0, "x = 1")]);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].line, 1);
        assert_eq!(units[0].text, "x = 1");
    }

    #[test]
    fn test_if_with_body() {
        let units = assemble(&[(0, "if True:"), (4, "x = 1"), (0, "y = 2")]);
        assert_eq!(units.len(), 2);
        let Statement::If { branches, else_block } = &units[0].statement else {
            panic!("expected an if construct");
        };
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].1.len(), 1);
        assert!(else_block.is_none());
        // the dedented statement executes after the construct
        assert_eq!(units[1].text, "y = 2");
    }

    #[test]
    fn test_elif_else_chain() {
        let units = assemble(&[
            (0, "if a:"),
            (4, "x = 1"),
            (0, "elif b:"),
            (4, "x = 2"),
            (0, "else:"),
            (4, "x = 3"),
        ]);
        assert_eq!(units.len(), 1);
        let Statement::If { branches, else_block } = &units[0].statement else {
            panic!("expected an if construct");
        };
        assert_eq!(branches.len(), 2);
        assert_eq!(else_block.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_nested_blocks() {
        let units = assemble(&[
            (0, "while a:"),
            (4, "if b:"),
            (8, "x = 1"),
            (4, "y = 2"),
        ]);
        assert_eq!(units.len(), 1);
        let Statement::While { body, .. } = &units[0].statement else {
            panic!("expected a while construct");
        };
        assert_eq!(body.len(), 2);
        assert!(matches!(body[0], Statement::If { .. }));
    }

    #[test]
    fn test_nested_if_inside_branch_then_elif() {
        // the inner if closes into the outer then-branch before the elif
        // switches branches
        let units = assemble(&[
            (0, "if a:"),
            (4, "if b:"),
            (8, "x = 1"),
            (0, "elif c:"),
            (4, "x = 2"),
        ]);
        assert_eq!(units.len(), 1);
        let Statement::If { branches, .. } = &units[0].statement else {
            panic!("expected an if construct");
        };
        assert_eq!(branches.len(), 2);
        assert!(matches!(branches[0].1[0], Statement::If { .. }));
    }

    #[test]
    fn test_empty_body_is_legal() {
        // header directly followed by another header at the same level
        let units = assemble(&[(0, "if a:"), (0, "while b:"), (4, "x = 1")]);
        assert_eq!(units.len(), 2);
        let Statement::If { branches, .. } = &units[0].statement else {
            panic!("expected an if construct");
        };
        assert!(branches[0].1.is_empty());
        assert!(matches!(units[1].statement, Statement::While { .. }));
    }

    #[test]
    fn test_for_over_literal() {
        let units = assemble(&[(0, "for c in \"ab\":"), (4, "x = c")]);
        let Statement::For { iterable, body, .. } = &units[0].statement else {
            panic!("expected a for construct");
        };
        assert_eq!(
            *iterable,
            crate::ast::Expression::Literal(Literal::String("ab".to_string()))
        );
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn test_dangling_elif() {
        let mut assembler = BlockAssembler::new();
        let err = assembler
            .feed_header(1, 0, "elif x:", parse_header("elif x:").unwrap())
            .unwrap_err();
        assert_eq!(err, AssemblyError::DanglingBranch("elif"));
    }

    #[test]
    fn test_elif_after_else() {
        let mut assembler = BlockAssembler::new();
        assembler
            .feed_header(1, 0, "if a:", parse_header("if a:").unwrap())
            .unwrap();
        assembler
            .feed_header(2, 0, "else:", parse_header("else:").unwrap())
            .unwrap();
        let err = assembler
            .feed_header(3, 0, "elif b:", parse_header("elif b:").unwrap())
            .unwrap_err();
        assert_eq!(err, AssemblyError::BranchAfterElse);
    }

    #[test]
    fn test_unit_carries_header_line() {
        let units = assemble(&[(0, "x = 0"), (0, "if a:"), (4, "x = 1")]);
        assert_eq!(units[1].line, 2);
        assert_eq!(units[1].text, "if a:");
    }
}
