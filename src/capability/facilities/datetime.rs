//! `datetime` facility. Timestamps are exchanged as RFC 3339 strings;
//! the value system has no dedicated datetime type.

use chrono::{Local, NaiveDate, NaiveDateTime};

use super::checked_format;
use crate::capability::native::{expect_args, string_arg, CallError, NativeFunction};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("now", now),
        NativeFunction::from_closure("today", today),
        NativeFunction::from_closure("strftime", strftime),
        NativeFunction::from_closure("strptime", strptime),
    ]
}

fn now(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("now", &args, 0)?;
    Ok(Value::String(Local::now().to_rfc3339()))
}

fn today(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("today", &args, 0)?;
    Ok(Value::String(Local::now().date_naive().to_string()))
}

fn strftime(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("strftime", &args, 1)?;
    let format = string_arg("strftime", &args, 0)?;
    checked_format(&Local::now(), format, "strftime").map(Value::String)
}

fn strptime(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("strptime", &args, 2)?;
    let text = string_arg("strptime", &args, 0)?;
    let format = string_arg("strptime", &args, 1)?;
    let naive = NaiveDateTime::parse_from_str(text, format)
        .or_else(|_| {
            NaiveDate::parse_from_str(text, format).map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|e| CallError::InvalidArgument {
            name: "strptime".to_string(),
            message: format!("cannot parse {:?} with {:?}: {}", text, format, e),
        })?;
    Ok(Value::String(naive.and_utc().to_rfc3339()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_parses_back() {
        let Value::String(stamp) = now(vec![]).unwrap() else {
            panic!("expected a string");
        };
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn test_today_shape() {
        let Value::String(date) = today(vec![]).unwrap() else {
            panic!("expected a string");
        };
        assert!(NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_strptime_date_only() {
        let parsed = strptime(vec![
            Value::String("2024-06-01".to_string()),
            Value::String("%Y-%m-%d".to_string()),
        ])
        .unwrap();
        assert_eq!(
            parsed,
            Value::String("2024-06-01T00:00:00+00:00".to_string())
        );
    }
}
