//! String built-ins.

use crate::capability::native::{
    expect_args, expect_range, list_arg, string_arg, CallError, NativeFunction,
};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("redupper", upper),
        NativeFunction::from_closure("redlower", lower),
        NativeFunction::from_closure("redstrip", strip),
        NativeFunction::from_closure("redsplit", split),
        NativeFunction::from_closure("redjoin", join),
        NativeFunction::from_closure("redreplace", replace),
        NativeFunction::from_closure("redstartswith", startswith),
        NativeFunction::from_closure("redendswith", endswith),
        NativeFunction::from_closure("redfind", find),
    ]
}

fn upper(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redupper", &args, 1)?;
    Ok(Value::String(string_arg("redupper", &args, 0)?.to_uppercase()))
}

fn lower(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redlower", &args, 1)?;
    Ok(Value::String(string_arg("redlower", &args, 0)?.to_lowercase()))
}

fn strip(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redstrip", &args, 1)?;
    Ok(Value::String(string_arg("redstrip", &args, 0)?.trim().to_string()))
}

fn split(args: Vec<Value>) -> Result<Value, CallError> {
    expect_range("redsplit", &args, 1, 2)?;
    let text = string_arg("redsplit", &args, 0)?;
    let separator = if args.len() == 2 {
        string_arg("redsplit", &args, 1)?
    } else {
        " "
    };
    if separator.is_empty() {
        return Err(CallError::InvalidArgument {
            name: "redsplit".to_string(),
            message: "empty separator".to_string(),
        });
    }
    Ok(Value::List(
        text.split(separator)
            .map(|part| Value::String(part.to_string()))
            .collect(),
    ))
}

fn join(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redjoin", &args, 2)?;
    let separator = string_arg("redjoin", &args, 0)?;
    let items = list_arg("redjoin", &args, 1)?;
    let mut parts = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => parts.push(s.as_str()),
            other => {
                return Err(CallError::InvalidArgument {
                    name: "redjoin".to_string(),
                    message: format!("item {} is {}, expected str", i, other.type_name()),
                })
            }
        }
    }
    Ok(Value::String(parts.join(separator)))
}

fn replace(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redreplace", &args, 3)?;
    let text = string_arg("redreplace", &args, 0)?;
    let old = string_arg("redreplace", &args, 1)?;
    let new = string_arg("redreplace", &args, 2)?;
    Ok(Value::String(text.replace(old, new)))
}

fn startswith(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redstartswith", &args, 2)?;
    let text = string_arg("redstartswith", &args, 0)?;
    let prefix = string_arg("redstartswith", &args, 1)?;
    Ok(Value::Boolean(text.starts_with(prefix)))
}

fn endswith(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redendswith", &args, 2)?;
    let text = string_arg("redendswith", &args, 0)?;
    let suffix = string_arg("redendswith", &args, 1)?;
    Ok(Value::Boolean(text.ends_with(suffix)))
}

/// Character index of the first occurrence, or -1.
fn find(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redfind", &args, 2)?;
    let text = string_arg("redfind", &args, 0)?;
    let needle = string_arg("redfind", &args, 1)?;
    match text.find(needle) {
        Some(byte_index) => Ok(Value::Integer(text[..byte_index].chars().count() as i64)),
        None => Ok(Value::Integer(-1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::String(text.to_string())
    }

    #[test]
    fn test_case_and_strip() {
        assert_eq!(upper(vec![s("hi")]).unwrap(), s("HI"));
        assert_eq!(lower(vec![s("Hi")]).unwrap(), s("hi"));
        assert_eq!(strip(vec![s("  x  ")]).unwrap(), s("x"));
    }

    #[test]
    fn test_split_join_round_trip() {
        let parts = split(vec![s("a,b,c"), s(",")]).unwrap();
        assert_eq!(parts, Value::List(vec![s("a"), s("b"), s("c")]));
        assert_eq!(join(vec![s(","), parts]).unwrap(), s("a,b,c"));
    }

    #[test]
    fn test_join_rejects_non_strings() {
        assert!(join(vec![s(","), Value::List(vec![Value::Integer(1)])]).is_err());
    }

    #[test]
    fn test_find_counts_chars() {
        assert_eq!(find(vec![s("héllo"), s("llo")]).unwrap(), Value::Integer(2));
        assert_eq!(find(vec![s("abc"), s("z")]).unwrap(), Value::Integer(-1));
    }

    #[test]
    fn test_predicates() {
        assert_eq!(
            startswith(vec![s("redcode"), s("red")]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            endswith(vec![s("redcode"), s("red")]).unwrap(),
            Value::Boolean(false)
        );
    }
}
