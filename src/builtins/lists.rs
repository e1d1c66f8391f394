//! List built-ins. Values are immutable: functions that would mutate in
//! place return a new list instead; element mutation is written as index
//! assignment.

use std::cmp::Ordering;

use crate::capability::native::{
    expect_args, expect_range, int_arg, list_arg, CallError, NativeFunction,
};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("redlist", list),
        NativeFunction::from_closure("redappendlist", appendlist),
        NativeFunction::from_closure("redindex", index),
        NativeFunction::from_closure("redcount", count),
        NativeFunction::from_closure("redsort", sort),
        NativeFunction::from_closure("redreverse", reverse),
        NativeFunction::from_closure("redrange", range),
        NativeFunction::from_closure("redany", any),
        NativeFunction::from_closure("redall", all),
        NativeFunction::from_async("redmap", |args| Box::pin(map(args))),
        NativeFunction::from_async("redfilter", |args| Box::pin(filter(args))),
    ]
}

fn list(args: Vec<Value>) -> Result<Value, CallError> {
    Ok(Value::List(args))
}

fn appendlist(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redappendlist", &args, 2)?;
    let mut items = list_arg("redappendlist", &args, 0)?.to_vec();
    items.push(args[1].clone());
    Ok(Value::List(items))
}

fn index(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redindex", &args, 2)?;
    let items = list_arg("redindex", &args, 0)?;
    items
        .iter()
        .position(|item| item.loose_eq(&args[1]))
        .map(|i| Value::Integer(i as i64))
        .ok_or_else(|| CallError::InvalidArgument {
            name: "redindex".to_string(),
            message: format!("{} is not in list", args[1]),
        })
}

fn count(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redcount", &args, 2)?;
    let items = list_arg("redcount", &args, 0)?;
    let n = items.iter().filter(|item| item.loose_eq(&args[1])).count();
    Ok(Value::Integer(n as i64))
}

fn sort(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redsort", &args, 1)?;
    let mut items = list_arg("redsort", &args, 0)?.to_vec();
    // verify comparability up front so sort_by never sees None
    for pair in items.windows(2) {
        if pair[0].compare(&pair[1]).is_none() {
            return Err(CallError::InvalidArgument {
                name: "redsort".to_string(),
                message: format!(
                    "cannot compare {} and {}",
                    pair[0].type_name(),
                    pair[1].type_name()
                ),
            });
        }
    }
    items.sort_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal));
    Ok(Value::List(items))
}

fn reverse(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redreverse", &args, 1)?;
    let mut items = list_arg("redreverse", &args, 0)?.to_vec();
    items.reverse();
    Ok(Value::List(items))
}

fn range(args: Vec<Value>) -> Result<Value, CallError> {
    expect_range("redrange", &args, 1, 3)?;
    let (start, stop, step) = match args.len() {
        1 => (0, int_arg("redrange", &args, 0)?, 1),
        2 => (
            int_arg("redrange", &args, 0)?,
            int_arg("redrange", &args, 1)?,
            1,
        ),
        _ => (
            int_arg("redrange", &args, 0)?,
            int_arg("redrange", &args, 1)?,
            int_arg("redrange", &args, 2)?,
        ),
    };
    if step == 0 {
        return Err(CallError::InvalidArgument {
            name: "redrange".to_string(),
            message: "step must not be zero".to_string(),
        });
    }
    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        items.push(Value::Integer(current));
        current += step;
    }
    Ok(Value::List(items))
}

fn any(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redany", &args, 1)?;
    let items = list_arg("redany", &args, 0)?;
    Ok(Value::Boolean(items.iter().any(Value::is_truthy)))
}

fn all(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redall", &args, 1)?;
    let items = list_arg("redall", &args, 0)?;
    Ok(Value::Boolean(items.iter().all(Value::is_truthy)))
}

fn callable_arg<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a crate::capability::NativeFunction, CallError> {
    match args.get(index) {
        Some(Value::Native(f)) => Ok(f),
        Some(other) => Err(CallError::InvalidArgument {
            name: name.to_string(),
            message: format!(
                "argument {} must be a function, got {}",
                index + 1,
                other.type_name()
            ),
        }),
        None => Err(CallError::InvalidArgument {
            name: name.to_string(),
            message: format!("missing argument {}", index + 1),
        }),
    }
}

async fn map(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redmap", &args, 2)?;
    let function = callable_arg("redmap", &args, 0)?;
    let items = list_arg("redmap", &args, 1)?;
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(function.invoke(vec![item.clone()]).await?);
    }
    Ok(Value::List(mapped))
}

async fn filter(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redfilter", &args, 2)?;
    let function = callable_arg("redfilter", &args, 0)?;
    let items = list_arg("redfilter", &args, 1)?;
    let mut kept = Vec::new();
    for item in items {
        if function.invoke(vec![item.clone()]).await?.is_truthy() {
            kept.push(item.clone());
        }
    }
    Ok(Value::List(kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::NativeFunction;

    #[test]
    fn test_range_variants() {
        assert_eq!(
            range(vec![Value::Integer(3)]).unwrap(),
            Value::List(vec![
                Value::Integer(0),
                Value::Integer(1),
                Value::Integer(2)
            ])
        );
        assert_eq!(
            range(vec![Value::Integer(3), Value::Integer(0), Value::Integer(-1)]).unwrap(),
            Value::List(vec![
                Value::Integer(3),
                Value::Integer(2),
                Value::Integer(1)
            ])
        );
        assert!(range(vec![Value::Integer(1), Value::Integer(5), Value::Integer(0)]).is_err());
    }

    #[test]
    fn test_sort_and_reverse_return_new_lists() {
        let original = Value::List(vec![
            Value::Integer(3),
            Value::Integer(1),
            Value::Integer(2),
        ]);
        let sorted = sort(vec![original.clone()]).unwrap();
        assert_eq!(
            sorted,
            Value::List(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3)
            ])
        );
        // the input list is untouched
        assert_eq!(
            original,
            Value::List(vec![
                Value::Integer(3),
                Value::Integer(1),
                Value::Integer(2)
            ])
        );
        let reversed = reverse(vec![sorted]).unwrap();
        assert_eq!(
            reversed,
            Value::List(vec![
                Value::Integer(3),
                Value::Integer(2),
                Value::Integer(1)
            ])
        );
    }

    #[test]
    fn test_sort_rejects_mixed_types() {
        let mixed = Value::List(vec![Value::Integer(1), Value::String("a".to_string())]);
        assert!(sort(vec![mixed]).is_err());
    }

    #[test]
    fn test_index_and_count_use_loose_equality() {
        let items = Value::List(vec![Value::Integer(1), Value::Float(1.0)]);
        assert_eq!(
            index(vec![items.clone(), Value::Float(1.0)]).unwrap(),
            Value::Integer(0)
        );
        assert_eq!(
            count(vec![items, Value::Integer(1)]).unwrap(),
            Value::Integer(2)
        );
    }

    #[tokio::test]
    async fn test_map_and_filter() {
        let double = NativeFunction::from_closure("double", |args| match &args[0] {
            Value::Integer(i) => Ok(Value::Integer(i * 2)),
            _ => Err(CallError::Failed("not an int".to_string())),
        });
        let items = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
        let mapped = map(vec![Value::Native(double), items.clone()]).await.unwrap();
        assert_eq!(
            mapped,
            Value::List(vec![Value::Integer(2), Value::Integer(4)])
        );

        let truthy = NativeFunction::from_closure("truthy", |args| {
            Ok(Value::Boolean(args[0].is_truthy()))
        });
        let with_zero = Value::List(vec![Value::Integer(0), Value::Integer(7)]);
        let kept = filter(vec![Value::Native(truthy), with_zero]).await.unwrap();
        assert_eq!(kept, Value::List(vec![Value::Integer(7)]));
    }
}
