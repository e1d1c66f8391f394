//! Uniform calling convention for native callables.
//!
//! Every built-in and every facility operation is a [`NativeFunction`]: a
//! named, shared, async callable taking positional [`Value`] arguments.
//! Synchronous operations are adapted through a thin closure wrapper so
//! the evaluator only ever sees one shape.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::value::Value;

/// Failure of a raw native call, before any policy normalization.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("{name} expects {expected} argument(s), got {actual}")]
    Arity {
        name: String,
        expected: String,
        actual: usize,
    },
    #[error("{name}: {message}")]
    InvalidArgument { name: String, message: String },
    #[error("{0}")]
    Failed(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

pub type CallResult<T> = Result<T, CallError>;

/// Object-safe native call interface.
#[async_trait]
pub trait NativeFn: Send + Sync {
    async fn invoke(&self, args: Vec<Value>) -> CallResult<Value>;
}

/// A named native callable. Cheap to clone; the implementation is shared.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    inner: Arc<dyn NativeFn>,
}

impl NativeFunction {
    pub fn new(name: impl Into<String>, inner: Arc<dyn NativeFn>) -> Self {
        Self {
            name: Arc::from(name.into()),
            inner,
        }
    }

    /// Adapt a synchronous closure or fn pointer.
    pub fn from_closure<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> CallResult<Value> + Send + Sync + 'static,
    {
        Self::new(name, Arc::new(SyncClosure(f)))
    }

    /// Adapt an async closure returning a boxed future.
    pub fn from_async<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> NativeFuture + Send + Sync + 'static,
    {
        Self::new(name, Arc::new(AsyncClosure(f)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn invoke(&self, args: Vec<Value>) -> CallResult<Value> {
        self.inner.invoke(args).await
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.inner, &other.inner)
    }
}

pub type NativeFuture = Pin<Box<dyn Future<Output = CallResult<Value>> + Send>>;

struct SyncClosure<F>(F);

#[async_trait]
impl<F> NativeFn for SyncClosure<F>
where
    F: Fn(Vec<Value>) -> CallResult<Value> + Send + Sync,
{
    async fn invoke(&self, args: Vec<Value>) -> CallResult<Value> {
        (self.0)(args)
    }
}

struct AsyncClosure<F>(F);

#[async_trait]
impl<F> NativeFn for AsyncClosure<F>
where
    F: Fn(Vec<Value>) -> NativeFuture + Send + Sync,
{
    async fn invoke(&self, args: Vec<Value>) -> CallResult<Value> {
        (self.0)(args).await
    }
}

// ── argument helpers ──

/// Require an exact argument count.
pub fn expect_args(name: &str, args: &[Value], expected: usize) -> CallResult<()> {
    if args.len() != expected {
        return Err(CallError::Arity {
            name: name.to_string(),
            expected: expected.to_string(),
            actual: args.len(),
        });
    }
    Ok(())
}

/// Require an argument count within `min..=max`.
pub fn expect_range(name: &str, args: &[Value], min: usize, max: usize) -> CallResult<()> {
    if args.len() < min || args.len() > max {
        return Err(CallError::Arity {
            name: name.to_string(),
            expected: format!("{} to {}", min, max),
            actual: args.len(),
        });
    }
    Ok(())
}

/// Require at least `min` arguments.
pub fn expect_at_least(name: &str, args: &[Value], min: usize) -> CallResult<()> {
    if args.len() < min {
        return Err(CallError::Arity {
            name: name.to_string(),
            expected: format!("at least {}", min),
            actual: args.len(),
        });
    }
    Ok(())
}

fn type_error(name: &str, index: usize, expected: &str, got: &Value) -> CallError {
    CallError::InvalidArgument {
        name: name.to_string(),
        message: format!(
            "argument {} must be {}, got {}",
            index + 1,
            expected,
            got.type_name()
        ),
    }
}

pub fn string_arg<'a>(name: &str, args: &'a [Value], index: usize) -> CallResult<&'a str> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(type_error(name, index, "a string", other)),
        None => Err(CallError::InvalidArgument {
            name: name.to_string(),
            message: format!("missing argument {}", index + 1),
        }),
    }
}

pub fn int_arg(name: &str, args: &[Value], index: usize) -> CallResult<i64> {
    match args.get(index) {
        Some(Value::Integer(i)) => Ok(*i),
        Some(other) => Err(type_error(name, index, "an integer", other)),
        None => Err(CallError::InvalidArgument {
            name: name.to_string(),
            message: format!("missing argument {}", index + 1),
        }),
    }
}

/// Accept an integer or a float, widened to `f64`.
pub fn number_arg(name: &str, args: &[Value], index: usize) -> CallResult<f64> {
    match args.get(index) {
        Some(Value::Integer(i)) => Ok(*i as f64),
        Some(Value::Float(f)) => Ok(*f),
        Some(other) => Err(type_error(name, index, "a number", other)),
        None => Err(CallError::InvalidArgument {
            name: name.to_string(),
            message: format!("missing argument {}", index + 1),
        }),
    }
}

pub fn list_arg<'a>(name: &str, args: &'a [Value], index: usize) -> CallResult<&'a [Value]> {
    match args.get(index) {
        Some(Value::List(items)) => Ok(items),
        Some(other) => Err(type_error(name, index, "a list", other)),
        None => Err(CallError::InvalidArgument {
            name: name.to_string(),
            message: format!("missing argument {}", index + 1),
        }),
    }
}

pub fn map_arg<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
) -> CallResult<&'a std::collections::HashMap<String, Value>> {
    match args.get(index) {
        Some(Value::Map(entries)) => Ok(entries),
        Some(other) => Err(type_error(name, index, "a map", other)),
        None => Err(CallError::InvalidArgument {
            name: name.to_string(),
            message: format!("missing argument {}", index + 1),
        }),
    }
}
