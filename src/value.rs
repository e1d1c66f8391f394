//! Runtime values.
//!
//! RedCode is dynamically typed; every binding in the variable store is a
//! [`Value`]. Display follows the surface language (`True`, `None`), so
//! `redprint` and `redstr` render values the way a script author wrote
//! them.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde_json::{Number, Value as JsonValue};

use crate::capability::{CallError, FacilityHandle, NativeFunction};

/// A dynamically typed runtime value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    /// A named callable: a built-in, a capability wrapper, or a callable
    /// member of a facility result (e.g. a response's `json` accessor).
    Native(NativeFunction),
    /// Opaque handle to a loaded facility.
    Facility(FacilityHandle),
    /// Result of a statement that produces nothing.
    Unit,
    #[default]
    Null,
}

impl Value {
    /// Surface-language type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "str",
            Value::Boolean(_) => "bool",
            Value::List(_) => "list",
            Value::Map(_) => "dict",
            Value::Native(_) => "function",
            Value::Facility(_) => "facility",
            Value::Unit | Value::Null => "NoneType",
        }
    }

    /// Truthiness for conditions and `and`/`or`/`not`: zero, the empty
    /// string, the empty collection, and null are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Native(_) | Value::Facility(_) => true,
            Value::Unit | Value::Null => false,
        }
    }

    /// Equality with numeric widening (`1 == 1.0`).
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                *a as f64 == *b
            }
            (a, b) => a == b,
        }
    }

    /// Ordering across numbers, strings, and booleans. `None` for
    /// unordered pairs.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Convert to a JSON value. Callables and facility handles have no
    /// JSON form.
    pub fn to_json(&self) -> Result<JsonValue, CallError> {
        match self {
            Value::Integer(i) => Ok(JsonValue::Number((*i).into())),
            Value::Float(f) => Number::from_f64(*f).map(JsonValue::Number).ok_or_else(|| {
                CallError::Failed(format!("float {} is not JSON serializable", f))
            }),
            Value::String(s) => Ok(JsonValue::String(s.clone())),
            Value::Boolean(b) => Ok(JsonValue::Bool(*b)),
            Value::List(items) => items
                .iter()
                .map(Value::to_json)
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            Value::Map(entries) => {
                let mut object = serde_json::Map::with_capacity(entries.len());
                for (key, value) in entries {
                    object.insert(key.clone(), value.to_json()?);
                }
                Ok(JsonValue::Object(object))
            }
            Value::Unit | Value::Null => Ok(JsonValue::Null),
            Value::Native(f) => Err(CallError::Failed(format!(
                "function {} is not JSON serializable",
                f.name()
            ))),
            Value::Facility(handle) => Err(CallError::Failed(format!(
                "facility {} is not JSON serializable",
                handle.name()
            ))),
        }
    }

    /// Build from a JSON value.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(object) => Value::Map(
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Quoted form for display inside containers.
    fn repr(&self) -> String {
        match self {
            Value::String(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(true) => write!(f, "True"),
            Value::Boolean(false) => write!(f, "False"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item.repr())?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                // sorted keys keep output deterministic
                let mut keys: Vec<&String> = entries.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, entries[*key].repr())?;
                }
                write!(f, "}}")
            }
            Value::Native(function) => write!(f, "<function {}>", function.name()),
            Value::Facility(handle) => write!(f, "<facility {}>", handle.name()),
            Value::Unit | Value::Null => write!(f, "None"),
        }
    }
}
