//! `base64` facility: standard-alphabet encode/decode over strings.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::capability::native::{expect_args, string_arg, CallError, NativeFunction};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("b64encode", b64encode),
        NativeFunction::from_closure("b64decode", b64decode),
    ]
}

fn b64encode(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("b64encode", &args, 1)?;
    let text = string_arg("b64encode", &args, 0)?;
    Ok(Value::String(STANDARD.encode(text.as_bytes())))
}

fn b64decode(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("b64decode", &args, 1)?;
    let text = string_arg("b64decode", &args, 0)?;
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| CallError::InvalidArgument {
            name: "b64decode".to_string(),
            message: e.to_string(),
        })?;
    String::from_utf8(bytes)
        .map(Value::String)
        .map_err(|_| CallError::InvalidArgument {
            name: "b64decode".to_string(),
            message: "decoded bytes are not valid UTF-8".to_string(),
        })
}
