//! `requests` facility: HTTP verbs over a shared client.
//!
//! Every verb returns the same normalized response record:
//! `status_code`, `text`, `headers`, `url`, and a zero-argument `json`
//! member that parses the body on demand when the response advertised a
//! JSON content type.

use std::collections::HashMap;

use reqwest::{Client, Method};
use tracing::debug;

use crate::capability::native::{
    expect_range, string_arg, CallError, CallResult, NativeFunction,
};
use crate::value::Value;

const VERBS: [(&str, Method); 7] = [
    ("get", Method::GET),
    ("post", Method::POST),
    ("put", Method::PUT),
    ("delete", Method::DELETE),
    ("patch", Method::PATCH),
    ("head", Method::HEAD),
    ("options", Method::OPTIONS),
];

pub(crate) fn entries(client: Client) -> Vec<NativeFunction> {
    VERBS
        .iter()
        .map(|(name, method)| request_fn(client.clone(), *name, method.clone()))
        .collect()
}

fn request_fn(client: Client, name: &'static str, method: Method) -> NativeFunction {
    NativeFunction::from_async(name, move |args| {
        let client = client.clone();
        let method = method.clone();
        Box::pin(perform(client, name, method, args))
    })
}

async fn perform(
    client: Client,
    name: &'static str,
    method: Method,
    args: Vec<Value>,
) -> CallResult<Value> {
    expect_range(name, &args, 1, 2)?;
    let url = string_arg(name, &args, 0)?.to_string();
    debug!(%method, url = %url, "issuing request");

    let mut request = client.request(method, &url);
    if let Some(body) = args.get(1) {
        request = match body {
            Value::String(text) => request.body(text.clone()),
            Value::Map(_) | Value::List(_) => request.json(&body.to_json()?),
            other => {
                return Err(CallError::InvalidArgument {
                    name: name.to_string(),
                    message: format!("unsupported request body type: {}", other.type_name()),
                })
            }
        };
    }

    let response = request.send().await?;
    response_record(response).await
}

/// Flatten a response into the record shape scripts consume.
async fn response_record(response: reqwest::Response) -> CallResult<Value> {
    let status = response.status().as_u16() as i64;
    let url = response.url().to_string();

    let mut headers = HashMap::new();
    for (key, value) in response.headers() {
        headers.insert(
            key.as_str().to_string(),
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        );
    }
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let text = response.text().await?;

    // the structured body is parsed only when the accessor is called
    let json_text = text.clone();
    let json_accessor = NativeFunction::from_closure("json", move |_args| {
        if !content_type.starts_with("application/json") {
            return Ok(Value::Null);
        }
        let parsed: serde_json::Value = serde_json::from_str(&json_text)?;
        Ok(Value::from_json(&parsed))
    });

    let mut record = HashMap::new();
    record.insert("status_code".to_string(), Value::Integer(status));
    record.insert("text".to_string(), Value::String(text));
    record.insert("json".to_string(), Value::Native(json_accessor));
    record.insert("headers".to_string(), Value::Map(headers));
    record.insert("url".to_string(), Value::String(url));
    Ok(Value::Map(record))
}
