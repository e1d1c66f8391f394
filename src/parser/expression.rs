//! nom expression grammar.
//!
//! Precedence, loosest first: `or`, `and`, `not`, comparison, additive,
//! multiplicative, unary minus, postfix (call / index), primary. All
//! parsers are single-line; newlines never appear in their input.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{anychar, char, digit1},
    combinator::{map, map_res, not, opt, recognize, value, verify},
    error::context,
    multi::{fold_many0, separated_list0},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
};

use super::ParserResult;
use crate::ast::{BinaryOperator, Expression, Literal, UnaryOperator};

/// Names that can never be identifiers.
const RESERVED: [&str; 18] = [
    "if", "elif", "else", "for", "while", "def", "class", "try", "except", "finally", "with",
    "in", "and", "or", "not", "True", "False", "None",
];

/// Horizontal whitespace.
pub(crate) fn ws(input: &str) -> ParserResult<&str> {
    take_while(|c| c == ' ' || c == '\t')(input)
}

/// A literal word with a word boundary after it.
pub(crate) fn word<'a>(
    kw: &'static str,
) -> impl FnMut(&'a str) -> ParserResult<'a, &'a str> {
    terminated(
        tag(kw),
        not(verify(anychar, |c: &char| {
            c.is_ascii_alphanumeric() || *c == '_'
        })),
    )
}

pub(crate) fn identifier(input: &str) -> ParserResult<String> {
    context(
        "identifier",
        map(
            verify(
                recognize(pair(
                    take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
                    take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
                )),
                |ident: &str| !RESERVED.contains(&ident),
            ),
            str::to_string,
        ),
    )(input)
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

fn string_body<'a>(quote: char) -> impl FnMut(&'a str) -> ParserResult<'a, String> {
    fold_many0(
        alt((
            preceded(char('\\'), map(anychar, unescape)),
            verify(anychar, move |c: &char| *c != quote && *c != '\\'),
        )),
        String::new,
        |mut acc, c| {
            acc.push(c);
            acc
        },
    )
}

/// String literals accept both quote styles.
pub(crate) fn string_text(input: &str) -> ParserResult<String> {
    context(
        "string literal",
        alt((
            delimited(char('"'), string_body('"'), char('"')),
            delimited(char('\''), string_body('\''), char('\'')),
        )),
    )(input)
}

fn float_literal(input: &str) -> ParserResult<Literal> {
    context(
        "float literal",
        map_res(
            recognize(tuple((digit1, char('.'), digit1))),
            |s: &str| s.parse::<f64>().map(Literal::Float),
        ),
    )(input)
}

fn integer_literal(input: &str) -> ParserResult<Literal> {
    context(
        "integer literal",
        map_res(digit1, |s: &str| s.parse::<i64>().map(Literal::Integer)),
    )(input)
}

fn literal(input: &str) -> ParserResult<Literal> {
    context(
        "literal",
        alt((
            map(string_text, Literal::String),
            float_literal,
            integer_literal,
            value(Literal::Boolean(true), word("True")),
            value(Literal::Boolean(false), word("False")),
            value(Literal::Null, word("None")),
        )),
    )(input)
}

fn list_literal(input: &str) -> ParserResult<Expression> {
    context(
        "list literal",
        map(
            delimited(
                char('['),
                separated_list0(preceded(ws, char(',')), expression),
                preceded(ws, char(']')),
            ),
            Expression::List,
        ),
    )(input)
}

fn map_entry(input: &str) -> ParserResult<(String, Expression)> {
    separated_pair(
        preceded(ws, string_text),
        preceded(ws, char(':')),
        expression,
    )(input)
}

fn map_literal(input: &str) -> ParserResult<Expression> {
    context(
        "map literal",
        map(
            delimited(
                char('{'),
                separated_list0(preceded(ws, char(',')), map_entry),
                preceded(ws, char('}')),
            ),
            Expression::Map,
        ),
    )(input)
}

fn primary(input: &str) -> ParserResult<Expression> {
    preceded(
        ws,
        alt((
            map(literal, Expression::Literal),
            list_literal,
            map_literal,
            map(identifier, Expression::Variable),
            delimited(char('('), expression, preceded(ws, char(')'))),
        )),
    )(input)
}

/// Call-argument list suffix: `(a, b)`.
pub(crate) fn call_args(input: &str) -> ParserResult<Vec<Expression>> {
    preceded(
        ws,
        delimited(
            char('('),
            separated_list0(preceded(ws, char(',')), expression),
            preceded(ws, char(')')),
        ),
    )(input)
}

/// Index suffix: `[expr]`.
pub(crate) fn index_suffix(input: &str) -> ParserResult<Expression> {
    preceded(
        ws,
        delimited(char('['), expression, preceded(ws, char(']'))),
    )(input)
}

enum Postfix {
    Call(Vec<Expression>),
    Index(Expression),
}

fn postfix(input: &str) -> ParserResult<Expression> {
    let (input, base) = primary(input)?;
    fold_many0(
        alt((
            map(call_args, Postfix::Call),
            map(index_suffix, Postfix::Index),
        )),
        move || base.clone(),
        |acc, suffix| match suffix {
            Postfix::Call(arguments) => Expression::Call {
                callee: Box::new(acc),
                arguments,
            },
            Postfix::Index(index) => Expression::Index {
                target: Box::new(acc),
                index: Box::new(index),
            },
        },
    )(input)
}

fn unary(input: &str) -> ParserResult<Expression> {
    preceded(
        ws,
        alt((
            map(preceded(char('-'), unary), |operand| Expression::Unary {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            }),
            postfix,
        )),
    )(input)
}

fn binary_chain<'a>(
    operand: fn(&'a str) -> ParserResult<'a, Expression>,
    operator: impl FnMut(&'a str) -> ParserResult<'a, BinaryOperator>,
    input: &'a str,
) -> ParserResult<'a, Expression> {
    let (input, first) = operand(input)?;
    fold_many0(
        pair(preceded(ws, operator), operand),
        move || first.clone(),
        |left, (op, right)| Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
    )(input)
}

fn multiplicative(input: &str) -> ParserResult<Expression> {
    binary_chain(
        unary,
        alt((
            value(BinaryOperator::Multiply, char('*')),
            value(BinaryOperator::Divide, char('/')),
            value(BinaryOperator::Modulo, char('%')),
        )),
        input,
    )
}

fn additive(input: &str) -> ParserResult<Expression> {
    binary_chain(
        multiplicative,
        alt((
            value(BinaryOperator::Add, char('+')),
            value(BinaryOperator::Subtract, char('-')),
        )),
        input,
    )
}

fn comparison_operator(input: &str) -> ParserResult<BinaryOperator> {
    alt((
        value(BinaryOperator::Equal, tag("==")),
        value(BinaryOperator::NotEqual, tag("!=")),
        value(BinaryOperator::LessEqual, tag("<=")),
        value(BinaryOperator::GreaterEqual, tag(">=")),
        value(BinaryOperator::Less, char('<')),
        value(BinaryOperator::Greater, char('>')),
    ))(input)
}

/// A single comparison; chains (`a < b < c`) are not part of the grammar.
fn comparison(input: &str) -> ParserResult<Expression> {
    let (input, left) = additive(input)?;
    let (input, tail) = opt(pair(preceded(ws, comparison_operator), additive))(input)?;
    Ok((
        input,
        match tail {
            Some((op, right)) => Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            None => left,
        },
    ))
}

fn not_expr(input: &str) -> ParserResult<Expression> {
    preceded(
        ws,
        alt((
            map(preceded(word("not"), not_expr), |operand| {
                Expression::Unary {
                    op: UnaryOperator::Not,
                    operand: Box::new(operand),
                }
            }),
            comparison,
        )),
    )(input)
}

fn and_expr(input: &str) -> ParserResult<Expression> {
    binary_chain(
        not_expr,
        value(BinaryOperator::And, word("and")),
        input,
    )
}

pub(crate) fn expression(input: &str) -> ParserResult<Expression> {
    binary_chain(and_expr, value(BinaryOperator::Or, word("or")), input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator as Op, Expression as E, Literal as L};

    fn parse(input: &str) -> Expression {
        let (rest, expr) = expression(input).unwrap();
        assert_eq!(rest.trim(), "", "unparsed input: {:?}", rest);
        expr
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("42"), E::Literal(L::Integer(42)));
        assert_eq!(parse("2.5"), E::Literal(L::Float(2.5)));
        assert_eq!(parse("True"), E::Literal(L::Boolean(true)));
        assert_eq!(parse("None"), E::Literal(L::Null));
        assert_eq!(
            parse(r#""a\nb""#),
            E::Literal(L::String("a\nb".to_string()))
        );
        assert_eq!(parse("'hi'"), E::Literal(L::String("hi".to_string())));
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let E::Binary { op: Op::Add, right, .. } = parse("1 + 2 * 3") else {
            panic!("expected addition at the top");
        };
        assert!(matches!(*right, E::Binary { op: Op::Multiply, .. }));

        // comparison binds looser than arithmetic
        assert!(matches!(
            parse("1 + 1 == 2"),
            E::Binary { op: Op::Equal, .. }
        ));

        // logical operators bind loosest
        assert!(matches!(
            parse("a == 1 and b == 2"),
            E::Binary { op: Op::And, .. }
        ));
    }

    #[test]
    fn test_keywords_need_boundaries() {
        // `android` is an identifier, not `and` + `roid`
        assert_eq!(parse("android"), E::Variable("android".to_string()));
        assert_eq!(parse("orchid"), E::Variable("orchid".to_string()));
        // `Trueish` is an identifier, not the literal
        assert_eq!(parse("Trueish"), E::Variable("Trueish".to_string()));
    }

    #[test]
    fn test_unary() {
        assert_eq!(
            parse("-3"),
            E::Unary {
                op: UnaryOperator::Negate,
                operand: Box::new(E::Literal(L::Integer(3)))
            }
        );
        assert!(matches!(
            parse("not ready"),
            E::Unary { op: UnaryOperator::Not, .. }
        ));
    }

    #[test]
    fn test_call_and_index_chains() {
        let expr = parse(r#"redprint("hi", 2)"#);
        let E::Call { callee, arguments } = expr else {
            panic!("expected a call");
        };
        assert_eq!(*callee, E::Variable("redprint".to_string()));
        assert_eq!(arguments.len(), 2);

        // chained postfix: response["json"]()
        let expr = parse(r#"response["json"]()"#);
        let E::Call { callee, arguments } = expr else {
            panic!("expected a call");
        };
        assert!(arguments.is_empty());
        assert!(matches!(*callee, E::Index { .. }));
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            parse("[1, 2]"),
            E::List(vec![E::Literal(L::Integer(1)), E::Literal(L::Integer(2))])
        );
        assert_eq!(
            parse(r#"{"a": 1}"#),
            E::Map(vec![("a".to_string(), E::Literal(L::Integer(1)))])
        );
        assert_eq!(parse("[]"), E::List(vec![]));
        assert_eq!(parse("{}"), E::Map(vec![]));
    }

    #[test]
    fn test_grouping() {
        // (1 + 2) * 3 parses as multiplication at the top
        assert!(matches!(
            parse("(1 + 2) * 3"),
            E::Binary { op: Op::Multiply, .. }
        ));
    }

    #[test]
    fn test_reserved_words_are_not_identifiers() {
        assert!(expression("for").is_err());
        assert!(expression("in").is_err());
    }
}
