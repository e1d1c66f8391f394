//! `hashlib` facility: digest functions returning lowercase hex strings.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::capability::native::{expect_args, string_arg, CallError, NativeFunction};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("md5", md5_digest),
        NativeFunction::from_closure("sha1", sha1_digest),
        NativeFunction::from_closure("sha256", sha256_digest),
    ]
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn md5_digest(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("md5", &args, 1)?;
    let text = string_arg("md5", &args, 0)?;
    Ok(Value::String(hex(Md5::digest(text.as_bytes()).as_slice())))
}

fn sha1_digest(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("sha1", &args, 1)?;
    let text = string_arg("sha1", &args, 0)?;
    Ok(Value::String(hex(Sha1::digest(text.as_bytes()).as_slice())))
}

fn sha256_digest(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("sha256", &args, 1)?;
    let text = string_arg("sha256", &args, 0)?;
    Ok(Value::String(hex(Sha256::digest(text.as_bytes()).as_slice())))
}
