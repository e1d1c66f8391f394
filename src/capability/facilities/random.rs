//! `random` facility. Passthrough policy: argument errors surface to the
//! calling statement.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::capability::native::{
    expect_args, int_arg, list_arg, CallError, NativeFunction,
};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("randint", randint),
        NativeFunction::from_closure("choice", choice),
        NativeFunction::from_closure("shuffle", shuffle),
        NativeFunction::from_closure("random", random),
    ]
}

fn randint(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("randint", &args, 2)?;
    let low = int_arg("randint", &args, 0)?;
    let high = int_arg("randint", &args, 1)?;
    if low > high {
        return Err(CallError::InvalidArgument {
            name: "randint".to_string(),
            message: format!("empty range: {} > {}", low, high),
        });
    }
    Ok(Value::Integer(rand::thread_rng().gen_range(low..=high)))
}

fn choice(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("choice", &args, 1)?;
    let items = list_arg("choice", &args, 0)?;
    items
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| CallError::InvalidArgument {
            name: "choice".to_string(),
            message: "cannot choose from an empty list".to_string(),
        })
}

/// Returns a new shuffled list; values are immutable, so there is no
/// in-place variant.
fn shuffle(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("shuffle", &args, 1)?;
    let mut items = list_arg("shuffle", &args, 0)?.to_vec();
    items.shuffle(&mut rand::thread_rng());
    Ok(Value::List(items))
}

fn random(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("random", &args, 0)?;
    Ok(Value::Float(rand::thread_rng().gen::<f64>()))
}
