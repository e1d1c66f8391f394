//! `urllib` facility: one-shot URL fetch helpers over the shared client.
//! Unlike `requests`, an HTTP error status is a failure here.

use std::fs;

use reqwest::Client;

use crate::capability::native::{expect_args, string_arg, CallResult, NativeFunction};
use crate::value::Value;

pub(crate) fn entries(client: Client) -> Vec<NativeFunction> {
    let open_client = client.clone();
    vec![
        NativeFunction::from_async("urlopen", move |args| {
            let client = open_client.clone();
            Box::pin(urlopen(client, args))
        }),
        NativeFunction::from_async("urlretrieve", move |args| {
            let client = client.clone();
            Box::pin(urlretrieve(client, args))
        }),
    ]
}

async fn urlopen(client: Client, args: Vec<Value>) -> CallResult<Value> {
    expect_args("urlopen", &args, 1)?;
    let url = string_arg("urlopen", &args, 0)?.to_string();
    let response = client.get(&url).send().await?.error_for_status()?;
    Ok(Value::String(response.text().await?))
}

async fn urlretrieve(client: Client, args: Vec<Value>) -> CallResult<Value> {
    expect_args("urlretrieve", &args, 2)?;
    let url = string_arg("urlretrieve", &args, 0)?.to_string();
    let path = string_arg("urlretrieve", &args, 1)?.to_string();
    let response = client.get(&url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    fs::write(&path, &bytes)?;
    Ok(Value::String(path))
}
