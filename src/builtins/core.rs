//! The minimal built-in set: output, interactive input, length, type
//! inspection, and numeric/string conversion.

use std::io::{self, BufRead, Write};

use crate::capability::native::{
    expect_args, expect_range, CallError, NativeFunction,
};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("redprint", print),
        NativeFunction::from_closure("redinput", input),
        NativeFunction::from_closure("redlen", len),
        NativeFunction::from_closure("redtype", type_of),
        NativeFunction::from_closure("redint", to_int),
        NativeFunction::from_closure("redstr", to_str),
        NativeFunction::from_closure("redfloat", to_float),
    ]
}

/// Space-joined output; returns the printed text.
fn print(args: Vec<Value>) -> Result<Value, CallError> {
    let output = args
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", output);
    io::stdout().flush()?;
    Ok(Value::String(output))
}

fn input(args: Vec<Value>) -> Result<Value, CallError> {
    expect_range("redinput", &args, 0, 1)?;
    if let Some(prompt) = args.first() {
        print!("{}", prompt);
        io::stdout().flush()?;
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Value::String(line))
}

fn len(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redlen", &args, 1)?;
    let length = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(entries) => entries.len(),
        other => {
            return Err(CallError::InvalidArgument {
                name: "redlen".to_string(),
                message: format!("object of type {} has no length", other.type_name()),
            })
        }
    };
    Ok(Value::Integer(length as i64))
}

fn type_of(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redtype", &args, 1)?;
    Ok(Value::String(args[0].type_name().to_string()))
}

fn to_int(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redint", &args, 1)?;
    match &args[0] {
        Value::Integer(i) => Ok(Value::Integer(*i)),
        Value::Float(f) => Ok(Value::Integer(*f as i64)),
        Value::Boolean(b) => Ok(Value::Integer(i64::from(*b))),
        Value::String(s) => s.trim().parse::<i64>().map(Value::Integer).map_err(|_| {
            CallError::InvalidArgument {
                name: "redint".to_string(),
                message: format!("invalid literal for int: {:?}", s),
            }
        }),
        other => Err(CallError::InvalidArgument {
            name: "redint".to_string(),
            message: format!("cannot convert {} to int", other.type_name()),
        }),
    }
}

fn to_str(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redstr", &args, 1)?;
    Ok(Value::String(args[0].to_string()))
}

fn to_float(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redfloat", &args, 1)?;
    match &args[0] {
        Value::Integer(i) => Ok(Value::Float(*i as f64)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Boolean(b) => Ok(Value::Float(f64::from(u8::from(*b)))),
        Value::String(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            CallError::InvalidArgument {
                name: "redfloat".to_string(),
                message: format!("invalid literal for float: {:?}", s),
            }
        }),
        other => Err(CallError::InvalidArgument {
            name: "redfloat".to_string(),
            message: format!("cannot convert {} to float", other.type_name()),
        }),
    }
}
