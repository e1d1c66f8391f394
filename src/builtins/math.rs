//! Numeric built-ins.

use crate::capability::native::{
    expect_args, expect_at_least, expect_range, int_arg, number_arg, CallError, NativeFunction,
};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("redabs", abs),
        NativeFunction::from_closure("redmax", max),
        NativeFunction::from_closure("redmin", min),
        NativeFunction::from_closure("redsum", sum),
        NativeFunction::from_closure("redround", round),
        NativeFunction::from_closure("redpow", pow),
        NativeFunction::from_closure("redsqrt", sqrt),
    ]
}

fn abs(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redabs", &args, 1)?;
    match &args[0] {
        Value::Integer(i) => Ok(Value::Integer(i.abs())),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(CallError::InvalidArgument {
            name: "redabs".to_string(),
            message: format!("expected a number, got {}", other.type_name()),
        }),
    }
}

/// A single list argument is treated as the candidate set; otherwise the
/// arguments themselves are.
fn candidates<'a>(name: &str, args: &'a [Value]) -> Result<&'a [Value], CallError> {
    expect_at_least(name, args, 1)?;
    match args {
        [Value::List(items)] => {
            if items.is_empty() {
                Err(CallError::InvalidArgument {
                    name: name.to_string(),
                    message: "empty list".to_string(),
                })
            } else {
                Ok(items)
            }
        }
        _ => Ok(args),
    }
}

fn extremum(name: &str, args: &[Value], keep_left: std::cmp::Ordering) -> Result<Value, CallError> {
    let items = candidates(name, args)?;
    let mut best = items[0].clone();
    for item in &items[1..] {
        let ordering = best.compare(item).ok_or_else(|| CallError::InvalidArgument {
            name: name.to_string(),
            message: format!(
                "cannot compare {} and {}",
                best.type_name(),
                item.type_name()
            ),
        })?;
        if ordering != keep_left && ordering != std::cmp::Ordering::Equal {
            best = item.clone();
        }
    }
    Ok(best)
}

fn max(args: Vec<Value>) -> Result<Value, CallError> {
    extremum("redmax", &args, std::cmp::Ordering::Greater)
}

fn min(args: Vec<Value>) -> Result<Value, CallError> {
    extremum("redmin", &args, std::cmp::Ordering::Less)
}

fn sum(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redsum", &args, 1)?;
    let items = match &args[0] {
        Value::List(items) => items,
        other => {
            return Err(CallError::InvalidArgument {
                name: "redsum".to_string(),
                message: format!("expected a list, got {}", other.type_name()),
            })
        }
    };
    let mut int_total: i64 = 0;
    let mut float_total = 0.0;
    let mut saw_float = false;
    for item in items {
        match item {
            Value::Integer(i) => {
                int_total = int_total.checked_add(*i).ok_or_else(|| {
                    CallError::Failed("integer overflow in redsum".to_string())
                })?
            }
            Value::Float(f) => {
                saw_float = true;
                float_total += f;
            }
            other => {
                return Err(CallError::InvalidArgument {
                    name: "redsum".to_string(),
                    message: format!("cannot sum {}", other.type_name()),
                })
            }
        }
    }
    if saw_float {
        Ok(Value::Float(float_total + int_total as f64))
    } else {
        Ok(Value::Integer(int_total))
    }
}

fn round(args: Vec<Value>) -> Result<Value, CallError> {
    expect_range("redround", &args, 1, 2)?;
    let x = number_arg("redround", &args, 0)?;
    if args.len() == 1 {
        return Ok(Value::Integer(x.round() as i64));
    }
    let digits = int_arg("redround", &args, 1)?;
    let factor = 10f64.powi(digits as i32);
    Ok(Value::Float((x * factor).round() / factor))
}

fn pow(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redpow", &args, 2)?;
    if let (Value::Integer(base), Value::Integer(exp)) = (&args[0], &args[1]) {
        if *exp >= 0 {
            let exp = u32::try_from(*exp).map_err(|_| {
                CallError::InvalidArgument {
                    name: "redpow".to_string(),
                    message: format!("exponent too large: {}", exp),
                }
            })?;
            return base
                .checked_pow(exp)
                .map(Value::Integer)
                .ok_or_else(|| CallError::Failed("integer overflow in redpow".to_string()));
        }
    }
    let base = number_arg("redpow", &args, 0)?;
    let exp = number_arg("redpow", &args, 1)?;
    Ok(Value::Float(base.powf(exp)))
}

fn sqrt(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redsqrt", &args, 1)?;
    let x = number_arg("redsqrt", &args, 0)?;
    if x < 0.0 {
        return Err(CallError::InvalidArgument {
            name: "redsqrt".to_string(),
            message: "math domain error".to_string(),
        });
    }
    Ok(Value::Float(x.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_varargs_and_list() {
        assert_eq!(
            max(vec![Value::Integer(1), Value::Integer(5), Value::Integer(3)]).unwrap(),
            Value::Integer(5)
        );
        assert_eq!(
            max(vec![Value::List(vec![
                Value::Float(1.5),
                Value::Integer(2)
            ])])
            .unwrap(),
            Value::Integer(2)
        );
        assert!(max(vec![Value::Integer(1), Value::String("a".to_string())]).is_err());
    }

    #[test]
    fn test_sum_widens_to_float() {
        assert_eq!(
            sum(vec![Value::List(vec![Value::Integer(1), Value::Integer(2)])]).unwrap(),
            Value::Integer(3)
        );
        assert_eq!(
            sum(vec![Value::List(vec![Value::Integer(1), Value::Float(0.5)])]).unwrap(),
            Value::Float(1.5)
        );
    }

    #[test]
    fn test_round() {
        assert_eq!(round(vec![Value::Float(2.6)]).unwrap(), Value::Integer(3));
        assert_eq!(
            round(vec![Value::Float(2.345), Value::Integer(2)]).unwrap(),
            Value::Float(2.35)
        );
    }

    #[test]
    fn test_pow() {
        assert_eq!(
            pow(vec![Value::Integer(2), Value::Integer(10)]).unwrap(),
            Value::Integer(1024)
        );
        assert_eq!(
            pow(vec![Value::Integer(2), Value::Integer(-1)]).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn test_sqrt_domain() {
        assert_eq!(sqrt(vec![Value::Integer(9)]).unwrap(), Value::Float(3.0));
        assert!(sqrt(vec![Value::Integer(-1)]).is_err());
    }
}
