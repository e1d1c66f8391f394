//! # Parser
//!
//! nom-based parsing of classified line bodies. The classifier decides
//! *what* a line is; this module decides what it *says*: a statement body
//! becomes a [`Statement`], a control-header line becomes a [`Header`].

pub(crate) mod expression;
pub(crate) mod statement;

use nom::combinator::all_consuming;
use nom::error::VerboseError;
use nom::sequence::terminated;
use thiserror::Error;

use crate::ast::{Header, Statement};

pub(crate) type ParserResult<'a, T> = nom::IResult<&'a str, T, VerboseError<&'a str>>;

/// Control keywords the classifier recognizes but the grammar does not
/// implement.
const UNSUPPORTED_KEYWORDS: [&str; 6] = ["def", "class", "try", "except", "finally", "with"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid statement '{text}': {message}")]
    InvalidStatement { text: String, message: String },
    #[error("invalid control header '{text}': {message}")]
    InvalidHeader { text: String, message: String },
    #[error("unsupported block construct: '{0}'")]
    UnsupportedConstruct(String),
}

fn describe(err: nom::Err<VerboseError<&str>>) -> String {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let remainder = e.errors.first().map(|(input, _)| *input).unwrap_or("");
            if remainder.is_empty() {
                "unexpected end of input".to_string()
            } else {
                let snippet: String = remainder.chars().take(20).collect();
                format!("unexpected input near {:?}", snippet)
            }
        }
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
    }
}

/// Parse a terminated statement's body.
pub fn parse_statement(text: &str) -> Result<Statement, ParseError> {
    all_consuming(terminated(statement::statement, expression::ws))(text)
        .map(|(_, statement)| statement)
        .map_err(|err| ParseError::InvalidStatement {
            text: text.trim().to_string(),
            message: describe(err),
        })
}

/// Parse a control-header line.
pub fn parse_header(text: &str) -> Result<Header, ParseError> {
    let trimmed = text.trim();
    let leading_word: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if UNSUPPORTED_KEYWORDS.contains(&leading_word.as_str()) {
        return Err(ParseError::UnsupportedConstruct(leading_word));
    }

    all_consuming(terminated(statement::header, expression::ws))(trimmed)
        .map(|(_, header)| header)
        .map_err(|err| ParseError::InvalidHeader {
            text: trimmed.to_string(),
            message: describe(err),
        })
}
