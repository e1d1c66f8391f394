//! `time` facility. Passthrough policy: failures surface to the calling
//! statement, and `sleep` is a genuine suspension point for the run.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use super::checked_format;
use crate::capability::native::{
    expect_args, expect_range, number_arg, string_arg, CallError, NativeFunction,
};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_async("sleep", |args| Box::pin(sleep(args))),
        NativeFunction::from_closure("time", time),
        NativeFunction::from_closure("strftime", strftime),
        NativeFunction::from_closure("strptime", strptime),
    ]
}

async fn sleep(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("sleep", &args, 1)?;
    let secs = number_arg("sleep", &args, 0)?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(CallError::InvalidArgument {
            name: "sleep".to_string(),
            message: format!("invalid duration: {}", secs),
        });
    }
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    Ok(Value::Null)
}

fn time(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("time", &args, 0)?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CallError::Failed(e.to_string()))?;
    Ok(Value::Float(now.as_secs_f64()))
}

fn strftime(args: Vec<Value>) -> Result<Value, CallError> {
    expect_range("strftime", &args, 1, 2)?;
    let format = string_arg("strftime", &args, 0)?;
    let datetime: DateTime<Local> = if args.len() == 2 {
        let epoch = number_arg("strftime", &args, 1)?;
        DateTime::from_timestamp(epoch as i64, 0)
            .ok_or_else(|| CallError::InvalidArgument {
                name: "strftime".to_string(),
                message: format!("timestamp out of range: {}", epoch),
            })?
            .with_timezone(&Local)
    } else {
        Local::now()
    };
    checked_format(&datetime, format, "strftime").map(Value::String)
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
    Ok(Value::Float(naive.and_utc().timestamp() as f64))
}
