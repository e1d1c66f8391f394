//! Map built-ins. Key enumeration is sorted so scripts see deterministic
//! order.

use crate::capability::native::{
    expect_args, expect_range, map_arg, string_arg, CallError, NativeFunction,
};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("redkeys", keys),
        NativeFunction::from_closure("redvalues", values),
        NativeFunction::from_closure("reditems", items),
        NativeFunction::from_closure("redget", get),
    ]
}

fn sorted_keys(entries: &std::collections::HashMap<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();
    keys
}

fn keys(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redkeys", &args, 1)?;
    let entries = map_arg("redkeys", &args, 0)?;
    Ok(Value::List(
        sorted_keys(entries)
            .into_iter()
            .map(|k| Value::String(k.clone()))
            .collect(),
    ))
}

fn values(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redvalues", &args, 1)?;
    let entries = map_arg("redvalues", &args, 0)?;
    Ok(Value::List(
        sorted_keys(entries)
            .into_iter()
            .map(|k| entries[k].clone())
            .collect(),
    ))
}

fn items(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("reditems", &args, 1)?;
    let entries = map_arg("reditems", &args, 0)?;
    Ok(Value::List(
        sorted_keys(entries)
            .into_iter()
            .map(|k| Value::List(vec![Value::String(k.clone()), entries[k].clone()]))
            .collect(),
    ))
}

fn get(args: Vec<Value>) -> Result<Value, CallError> {
    expect_range("redget", &args, 2, 3)?;
    let entries = map_arg("redget", &args, 0)?;
    let key = string_arg("redget", &args, 1)?;
    Ok(entries
        .get(key)
        .cloned()
        .unwrap_or_else(|| args.get(2).cloned().unwrap_or(Value::Null)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample() -> Value {
        Value::Map(HashMap::from([
            ("b".to_string(), Value::Integer(2)),
            ("a".to_string(), Value::Integer(1)),
        ]))
    }

    #[test]
    fn test_enumeration_is_sorted() {
        assert_eq!(
            keys(vec![sample()]).unwrap(),
            Value::List(vec![
                Value::String("a".to_string()),
                Value::String("b".to_string())
            ])
        );
        assert_eq!(
            values(vec![sample()]).unwrap(),
            Value::List(vec![Value::Integer(1), Value::Integer(2)])
        );
        assert_eq!(
            items(vec![sample()]).unwrap(),
            Value::List(vec![
                Value::List(vec![Value::String("a".to_string()), Value::Integer(1)]),
                Value::List(vec![Value::String("b".to_string()), Value::Integer(2)]),
            ])
        );
    }

    #[test]
    fn test_get_with_default() {
        assert_eq!(
            get(vec![sample(), Value::String("a".to_string())]).unwrap(),
            Value::Integer(1)
        );
        assert_eq!(
            get(vec![sample(), Value::String("z".to_string())]).unwrap(),
            Value::Null
        );
        assert_eq!(
            get(vec![
                sample(),
                Value::String("z".to_string()),
                Value::Integer(0)
            ])
            .unwrap(),
            Value::Integer(0)
        );
    }
}
