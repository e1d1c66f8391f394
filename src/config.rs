//! Runtime configuration.
//!
//! Loaded from an optional JSON file by the CLI; every field has a
//! default so a missing file or a partial document is fine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub network: NetworkConfig,
    /// Upper bound on `while`/`for` iterations. `None` means unbounded,
    /// matching the no-timeout execution model.
    pub max_loop_iterations: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds. `None` means requests may block
    /// indefinitely, matching the rest of the execution model.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("redcode/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.network.timeout_secs, None);
        assert!(config.network.user_agent.starts_with("redcode/"));
        assert_eq!(config.max_loop_iterations, None);
    }

    #[test]
    fn test_partial_document() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"network": {"timeout_secs": 5}}"#).unwrap();
        assert_eq!(config.network.timeout(), Some(Duration::from_secs(5)));
        assert!(config.network.user_agent.starts_with("redcode/"));
    }
}
