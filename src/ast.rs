//! AST nodes for the RedCode statement grammar.
//!
//! The grammar is deliberately small: literals, identifiers, calls,
//! indexing, unary/binary operators, assignment, and the three block
//! constructs (`if`/`elif`/`else`, `while`, `for`). Block bodies are not
//! parsed from a single line; the block assembler folds per-line
//! statements into the `body` vectors using indentation.

use strum_macros::{AsRefStr, Display};

/// A literal value in source form.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum UnaryOperator {
    #[strum(serialize = "-")]
    Negate,
    #[strum(serialize = "not")]
    Not,
}

/// Binary operators, in source notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum BinaryOperator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "%")]
    Modulo,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "or")]
    Or,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Variable(String),
    List(Vec<Expression>),
    /// Map literal; keys are string literals in source order.
    Map(Vec<(String, Expression)>),
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Call with an arbitrary callee expression (`redprint(..)`,
    /// `response["json"]()`).
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Index {
        target: Box<Expression>,
        index: Box<Expression>,
    },
}

/// Assignment target: a variable name with an optional index path
/// (`x`, `xs[0]`, `grid[1][2]`, `config["key"]`).
#[derive(Debug, Clone, PartialEq)]
pub struct AssignTarget {
    pub name: String,
    pub path: Vec<Expression>,
}

/// A statement. Simple statements come straight from the parser; block
/// constructs are produced by the block assembler.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression),
    Assignment {
        target: AssignTarget,
        value: Expression,
    },
    If {
        /// `(condition, body)` per `if`/`elif` branch, in source order.
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

/// A parsed control-structure header line, before its body is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    If(Expression),
    Elif(Expression),
    Else,
    While(Expression),
    For {
        variable: String,
        iterable: Expression,
    },
}

impl Header {
    /// Source keyword, for diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            Header::If(_) => "if",
            Header::Elif(_) => "elif",
            Header::Else => "else",
            Header::While(_) => "while",
            Header::For { .. } => "for",
        }
    }
}
