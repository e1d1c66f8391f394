//! `json` facility: structured-data encode/decode, in memory and to disk.

use std::fs;

use crate::capability::native::{expect_args, string_arg, CallError, NativeFunction};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("loads", loads),
        NativeFunction::from_closure("dumps", dumps),
        NativeFunction::from_closure("load", load),
        NativeFunction::from_closure("dump", dump),
    ]
}

fn loads(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("loads", &args, 1)?;
    let text = string_arg("loads", &args, 0)?;
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(Value::from_json(&json))
}

fn dumps(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("dumps", &args, 1)?;
    let json = args[0].to_json()?;
    Ok(Value::String(serde_json::to_string(&json)?))
}

fn load(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("load", &args, 1)?;
    let path = string_arg("load", &args, 0)?;
    let text = fs::read_to_string(path)?;
    let json: serde_json::Value = serde_json::from_str(&text)?;
    Ok(Value::from_json(&json))
}

fn dump(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("dump", &args, 2)?;
    let json = args[0].to_json()?;
    let path = string_arg("dump", &args, 1)?;
    fs::write(path, serde_json::to_string_pretty(&json)?)?;
    Ok(Value::Boolean(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_loads_dumps_round_trip() {
        let parsed = loads(vec![Value::String(r#"{"a": [1, 2.5, null]}"#.to_string())]).unwrap();
        let Value::Map(entries) = &parsed else {
            panic!("expected a map");
        };
        assert_eq!(
            entries["a"],
            Value::List(vec![Value::Integer(1), Value::Float(2.5), Value::Null])
        );

        let text = dumps(vec![parsed.clone()]).unwrap();
        let Value::String(text) = text else {
            panic!("expected a string");
        };
        assert_eq!(loads(vec![Value::String(text)]).unwrap(), parsed);
    }

    #[test]
    fn test_loads_rejects_malformed_input() {
        assert!(loads(vec![Value::String("{not json".to_string())]).is_err());
    }

    #[test]
    fn test_dump_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let value = Value::Map(HashMap::from([("k".to_string(), Value::Integer(7))]));

        let written = dump(vec![
            value.clone(),
            Value::String(path.to_string_lossy().into_owned()),
        ])
        .unwrap();
        assert_eq!(written, Value::Boolean(true));

        let loaded = load(vec![Value::String(path.to_string_lossy().into_owned())]).unwrap();
        assert_eq!(loaded, value);
    }
}
