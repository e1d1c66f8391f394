//! Expression evaluation.

use async_recursion::async_recursion;
use std::collections::HashMap;

use super::context::ExecutionContext;
use super::{EvalError, EvalResult};
use crate::ast::{BinaryOperator, Expression, Literal, UnaryOperator};
use crate::value::Value;

#[derive(Default)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }

    #[async_recursion]
    pub async fn eval_expression(
        &self,
        expr: &Expression,
        context: &mut ExecutionContext,
    ) -> EvalResult<Value> {
        match expr {
            Expression::Literal(lit) => Ok(eval_literal(lit)),
            Expression::Variable(name) => context
                .resolve(name)
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Expression::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expression(item, context).await?);
                }
                Ok(Value::List(values))
            }
            Expression::Map(entries) => {
                let mut map = HashMap::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), self.eval_expression(value, context).await?);
                }
                Ok(Value::Map(map))
            }
            Expression::Unary { op, operand } => {
                let value = self.eval_expression(operand, context).await?;
                eval_unary(*op, value)
            }
            // `and`/`or` short-circuit, so the right operand is evaluated
            // lazily
            Expression::Binary {
                op: BinaryOperator::And,
                left,
                right,
            } => {
                if !self.eval_expression(left, context).await?.is_truthy() {
                    return Ok(Value::Boolean(false));
                }
                let right = self.eval_expression(right, context).await?;
                Ok(Value::Boolean(right.is_truthy()))
            }
            Expression::Binary {
                op: BinaryOperator::Or,
                left,
                right,
            } => {
                if self.eval_expression(left, context).await?.is_truthy() {
                    return Ok(Value::Boolean(true));
                }
                let right = self.eval_expression(right, context).await?;
                Ok(Value::Boolean(right.is_truthy()))
            }
            Expression::Binary { op, left, right } => {
                let left = self.eval_expression(left, context).await?;
                let right = self.eval_expression(right, context).await?;
                eval_binary(*op, left, right)
            }
            Expression::Call { callee, arguments } => {
                let function = match self.eval_expression(callee, context).await? {
                    Value::Native(function) => function,
                    other => return Err(EvalError::NotCallable(other.type_name())),
                };
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.eval_expression(argument, context).await?);
                }
                Ok(function.invoke(args).await?)
            }
            Expression::Index { target, index } => {
                let target = self.eval_expression(target, context).await?;
                let index = self.eval_expression(index, context).await?;
                index_value(&target, &index)
            }
        }
    }
}

fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Integer(i) => Value::Integer(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
    }
}

fn eval_unary(op: UnaryOperator, value: Value) -> EvalResult<Value> {
    match (op, value) {
        (UnaryOperator::Negate, Value::Integer(i)) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| EvalError::InvalidOperation("integer overflow".to_string())),
        (UnaryOperator::Negate, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOperator::Negate, other) => Err(EvalError::InvalidOperation(format!(
            "'-' on {}",
            other.type_name()
        ))),
        (UnaryOperator::Not, value) => Ok(Value::Boolean(!value.is_truthy())),
    }
}

fn operand_error(op: BinaryOperator, left: &Value, right: &Value) -> EvalError {
    EvalError::InvalidOperation(format!(
        "'{}' on {} and {}",
        op,
        left.type_name(),
        right.type_name()
    ))
}

fn eval_binary(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
    use BinaryOperator::*;
    match op {
        Add => match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_add(*b)
                .map(Value::Integer)
                .ok_or_else(|| EvalError::InvalidOperation("integer overflow".to_string())),
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            (Value::List(a), Value::List(b)) => {
                let mut joined = a.clone();
                joined.extend(b.iter().cloned());
                Ok(Value::List(joined))
            }
            _ => numeric_op(op, &left, &right, |a, b| Ok(a + b)),
        },
        Subtract => match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_sub(*b)
                .map(Value::Integer)
                .ok_or_else(|| EvalError::InvalidOperation("integer overflow".to_string())),
            _ => numeric_op(op, &left, &right, |a, b| Ok(a - b)),
        },
        Multiply => match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_mul(*b)
                .map(Value::Integer)
                .ok_or_else(|| EvalError::InvalidOperation("integer overflow".to_string())),
            _ => numeric_op(op, &left, &right, |a, b| Ok(a * b)),
        },
        // division always widens to float
        Divide => match (&left, &right) {
            (Value::Integer(_) | Value::Float(_), Value::Integer(0)) => {
                Err(EvalError::DivisionByZero)
            }
            _ => numeric_op(op, &left, &right, |a, b| {
                if b == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(a / b)
                }
            }),
        },
        Modulo => match (&left, &right) {
            (Value::Integer(_), Value::Integer(0)) => Err(EvalError::DivisionByZero),
            (Value::Integer(_), Value::Integer(-1)) => Ok(Value::Integer(0)),
            // sign of the result follows the divisor
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(((a % b) + b) % b)),
            _ => numeric_op(op, &left, &right, |a, b| {
                if b == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(a - b * (a / b).floor())
                }
            }),
        },
        Equal => Ok(Value::Boolean(left.loose_eq(&right))),
        NotEqual => Ok(Value::Boolean(!left.loose_eq(&right))),
        Less | LessEqual | Greater | GreaterEqual => {
            let ordering = left
                .compare(&right)
                .ok_or_else(|| operand_error(op, &left, &right))?;
            let result = match op {
                Less => ordering.is_lt(),
                LessEqual => ordering.is_le(),
                Greater => ordering.is_gt(),
                GreaterEqual => ordering.is_ge(),
                _ => unreachable!(),
            };
            Ok(Value::Boolean(result))
        }
        // short-circuit forms are handled before operand evaluation
        And | Or => unreachable!("logical operators are evaluated lazily"),
    }
}

/// Apply a float operation to a numeric pair; integers widen only when a
/// float is involved, so the integer cases above take precedence.
fn numeric_op(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    f: impl Fn(f64, f64) -> EvalResult<f64>,
) -> EvalResult<Value> {
    let pair = match (left, right) {
        (Value::Integer(a), Value::Float(b)) => Some((*a as f64, *b)),
        (Value::Float(a), Value::Integer(b)) => Some((*a, *b as f64)),
        (Value::Float(a), Value::Float(b)) => Some((*a, *b)),
        (Value::Integer(a), Value::Integer(b)) => Some((*a as f64, *b as f64)),
        _ => None,
    };
    match pair {
        Some((a, b)) => f(a, b).map(Value::Float),
        None => Err(operand_error(op, left, right)),
    }
}

/// Resolve a possibly-negative index against a length.
pub(crate) fn resolve_index(len: usize, index: i64) -> EvalResult<usize> {
    let adjusted = if index < 0 { index + len as i64 } else { index };
    if adjusted < 0 || adjusted as usize >= len {
        return Err(EvalError::IndexOutOfRange(index));
    }
    Ok(adjusted as usize)
}

fn index_value(target: &Value, index: &Value) -> EvalResult<Value> {
    match (target, index) {
        (Value::List(items), Value::Integer(i)) => {
            resolve_index(items.len(), *i).map(|ix| items[ix].clone())
        }
        (Value::String(s), Value::Integer(i)) => {
            let chars: Vec<char> = s.chars().collect();
            resolve_index(chars.len(), *i).map(|ix| Value::String(chars[ix].to_string()))
        }
        (Value::Map(entries), Value::String(key)) => entries
            .get(key)
            .cloned()
            .ok_or_else(|| EvalError::KeyNotFound(key.clone())),
        (Value::List(_) | Value::String(_), other) => Err(EvalError::InvalidOperation(format!(
            "indices must be integers, not {}",
            other.type_name()
        ))),
        (Value::Map(_), other) => Err(EvalError::InvalidOperation(format!(
            "map keys must be strings, not {}",
            other.type_name()
        ))),
        (other, _) => Err(EvalError::NotIndexable(other.type_name())),
    }
}
