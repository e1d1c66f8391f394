//! Statement evaluation.

use async_recursion::async_recursion;

use super::context::ExecutionContext;
use super::expression::{resolve_index, ExpressionEvaluator};
use super::{EvalError, EvalResult};
use crate::ast::{AssignTarget, Expression, Statement};
use crate::value::Value;

pub struct StatementEvaluator {
    expression_evaluator: ExpressionEvaluator,
}

impl Default for StatementEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementEvaluator {
    pub fn new() -> Self {
        Self {
            expression_evaluator: ExpressionEvaluator::new(),
        }
    }

    #[async_recursion]
    pub async fn eval_statement(
        &self,
        statement: &Statement,
        context: &mut ExecutionContext,
    ) -> EvalResult<Value> {
        match statement {
            Statement::Expression(expr) => {
                self.expression_evaluator.eval_expression(expr, context).await
            }
            Statement::Assignment { target, value } => {
                self.eval_assignment(target, value, context).await
            }
            Statement::If {
                branches,
                else_block,
            } => self.eval_if(branches, else_block, context).await,
            Statement::While { condition, body } => self.eval_while(condition, body, context).await,
            Statement::For {
                variable,
                iterable,
                body,
            } => self.eval_for(variable, iterable, body, context).await,
        }
    }

    /// Evaluate statements in order; the value of the last one is the
    /// block's value.
    pub async fn eval_block(
        &self,
        statements: &[Statement],
        context: &mut ExecutionContext,
    ) -> EvalResult<Value> {
        let mut last = Value::Unit;
        for statement in statements {
            last = self.eval_statement(statement, context).await?;
        }
        Ok(last)
    }

    async fn eval_assignment(
        &self,
        target: &AssignTarget,
        value: &Expression,
        context: &mut ExecutionContext,
    ) -> EvalResult<Value> {
        let value = self
            .expression_evaluator
            .eval_expression(value, context)
            .await?;

        if target.path.is_empty() {
            context.set_variable(target.name.clone(), value);
            return Ok(Value::Unit);
        }

        // evaluate the index path before taking the mutable root borrow
        let mut indices = Vec::with_capacity(target.path.len());
        for index_expr in &target.path {
            indices.push(
                self.expression_evaluator
                    .eval_expression(index_expr, context)
                    .await?,
            );
        }
        let root = context
            .get_variable_mut(&target.name)
            .ok_or_else(|| EvalError::UndefinedVariable(target.name.clone()))?;
        assign_path(root, &indices, value)?;
        Ok(Value::Unit)
    }

    async fn eval_if(
        &self,
        branches: &[(Expression, Vec<Statement>)],
        else_block: &Option<Vec<Statement>>,
        context: &mut ExecutionContext,
    ) -> EvalResult<Value> {
        for (condition, body) in branches {
            let value = self
                .expression_evaluator
                .eval_expression(condition, context)
                .await?;
            if value.is_truthy() {
                return self.eval_block(body, context).await;
            }
        }
        match else_block {
            Some(body) => self.eval_block(body, context).await,
            None => Ok(Value::Unit),
        }
    }

    async fn eval_while(
        &self,
        condition: &Expression,
        body: &[Statement],
        context: &mut ExecutionContext,
    ) -> EvalResult<Value> {
        let limit = context.max_loop_iterations();
        let mut iterations: u64 = 0;
        loop {
            let value = self
                .expression_evaluator
                .eval_expression(condition, context)
                .await?;
            if !value.is_truthy() {
                return Ok(Value::Unit);
            }
            if let Some(limit) = limit {
                iterations += 1;
                if iterations > limit {
                    return Err(EvalError::MaxIterations(limit));
                }
            }
            self.eval_block(body, context).await?;
        }
    }

    async fn eval_for(
        &self,
        variable: &str,
        iterable: &Expression,
        body: &[Statement],
        context: &mut ExecutionContext,
    ) -> EvalResult<Value> {
        let iterable = self
            .expression_evaluator
            .eval_expression(iterable, context)
            .await?;
        let items = match iterable {
            Value::List(items) => items,
            Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
            Value::Map(entries) => {
                let mut keys: Vec<String> = entries.into_keys().collect();
                keys.sort();
                keys.into_iter().map(Value::String).collect()
            }
            other => return Err(EvalError::NotIterable(other.type_name())),
        };
        for item in items {
            // the loop variable persists after the loop, like any binding
            context.set_variable(variable, item);
            self.eval_block(body, context).await?;
        }
        Ok(Value::Unit)
    }
}

fn assign_path(root: &mut Value, indices: &[Value], value: Value) -> EvalResult<()> {
    let Some((first, rest)) = indices.split_first() else {
        *root = value;
        return Ok(());
    };
    match root {
        Value::List(items) => {
            let Value::Integer(i) = first else {
                return Err(EvalError::InvalidOperation(format!(
                    "indices must be integers, not {}",
                    first.type_name()
                )));
            };
            let ix = resolve_index(items.len(), *i)?;
            assign_path(&mut items[ix], rest, value)
        }
        Value::Map(entries) => {
            let Value::String(key) = first else {
                return Err(EvalError::InvalidOperation(format!(
                    "map keys must be strings, not {}",
                    first.type_name()
                )));
            };
            if rest.is_empty() {
                entries.insert(key.clone(), value);
                Ok(())
            } else {
                let slot = entries
                    .get_mut(key)
                    .ok_or_else(|| EvalError::KeyNotFound(key.clone()))?;
                assign_path(slot, rest, value)
            }
        }
        other => Err(EvalError::NotIndexable(other.type_name())),
    }
}
