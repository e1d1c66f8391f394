//! Capability wrapper factory.
//!
//! Every facility operation is wrapped with one of four error-normalization
//! policies before publication. Network, structured-data and generic
//! wrappers degrade failures to in-band `{"error": ...}` map values;
//! passthrough wrappers let failures surface to the per-statement failure
//! handling.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::native::{CallResult, NativeFn, NativeFunction};
use super::CAPABILITY_PREFIX;
use crate::value::Value;

/// Error-normalization policy for one facility's wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum WrapPolicy {
    /// Failures become `{"error": <message>, "status_code": 0}`.
    Network,
    /// Failures become `{"error": "<name> failed: <message>"}`.
    StructuredData,
    /// Results and failures pass through unmodified.
    Passthrough,
    /// Failures become `{"error": "<name> failed: <message>"}`.
    Generic,
}

/// Wrap a raw facility operation under `policy`, publishing it under the
/// capability prefix: a raw `sleep` becomes `redsleep`.
pub fn wrap(raw: NativeFunction, policy: WrapPolicy) -> NativeFunction {
    let published = format!("{}{}", CAPABILITY_PREFIX, raw.name());
    debug!(raw = raw.name(), published = %published, %policy, "wrapping capability");
    NativeFunction::new(published, Arc::new(PolicyWrapped { raw, policy }))
}

struct PolicyWrapped {
    raw: NativeFunction,
    policy: WrapPolicy,
}

#[async_trait]
impl NativeFn for PolicyWrapped {
    async fn invoke(&self, args: Vec<Value>) -> CallResult<Value> {
        match self.raw.invoke(args).await {
            Ok(value) => Ok(value),
            Err(err) => match self.policy {
                WrapPolicy::Passthrough => Err(err),
                WrapPolicy::Network => {
                    let mut record = HashMap::new();
                    record.insert("error".to_string(), Value::String(err.to_string()));
                    record.insert("status_code".to_string(), Value::Integer(0));
                    Ok(Value::Map(record))
                }
                WrapPolicy::StructuredData | WrapPolicy::Generic => {
                    let mut record = HashMap::new();
                    record.insert(
                        "error".to_string(),
                        Value::String(format!("{} failed: {}", self.raw.name(), err)),
                    );
                    Ok(Value::Map(record))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::native::CallError;

    fn failing(name: &str) -> NativeFunction {
        let name_owned = name.to_string();
        NativeFunction::from_closure(name, move |_| {
            Err(CallError::Failed(format!("{} blew up", name_owned)))
        })
    }

    #[tokio::test]
    async fn test_wrapped_name_is_prefixed() {
        let wrapped = wrap(failing("sleep"), WrapPolicy::Passthrough);
        assert_eq!(wrapped.name(), "redsleep");
    }

    #[tokio::test]
    async fn test_network_policy_degrades_to_record() {
        let wrapped = wrap(failing("get"), WrapPolicy::Network);
        let result = wrapped.invoke(vec![]).await.unwrap();
        let Value::Map(record) = result else {
            panic!("expected a map");
        };
        assert_eq!(record["status_code"], Value::Integer(0));
        assert_eq!(record["error"], Value::String("get blew up".to_string()));
    }

    #[tokio::test]
    async fn test_generic_policy_prefixes_bare_name() {
        let wrapped = wrap(failing("b64decode"), WrapPolicy::Generic);
        let result = wrapped.invoke(vec![]).await.unwrap();
        let Value::Map(record) = result else {
            panic!("expected a map");
        };
        assert_eq!(
            record["error"],
            Value::String("b64decode failed: b64decode blew up".to_string())
        );
    }

    #[tokio::test]
    async fn test_passthrough_policy_propagates() {
        let wrapped = wrap(failing("sleep"), WrapPolicy::Passthrough);
        assert!(wrapped.invoke(vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_success_passes_through_unchanged() {
        let raw = NativeFunction::from_closure("time", |_| Ok(Value::Float(12.5)));
        let wrapped = wrap(raw, WrapPolicy::Passthrough);
        assert_eq!(wrapped.invoke(vec![]).await.unwrap(), Value::Float(12.5));
    }
}
