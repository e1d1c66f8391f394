//! # Capability Registry
//!
//! The single name→entry map behind the execution namespace. Built-ins
//! are registered here once at startup by explicit enumeration; facility
//! wrappers are published on demand by [`CapabilityRegistry::ensure_loaded`].
//!
//! Loading is idempotent: the first import of a facility constructs it,
//! wraps its allow-listed operations through the policy factory, and
//! publishes them under the `red` prefix together with a handle alias;
//! every later import returns the cached handle untouched.

use std::collections::HashMap;
use std::str::FromStr;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use super::facilities;
use super::facility::{FacilityHandle, FacilityKind};
use super::policy;
use super::CAPABILITY_PREFIX;
use crate::config::NetworkConfig;
use crate::value::Value;

/// Facility load failure. Never normalized into a value: an import that
/// fails aborts the run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot import facility '{0}': unknown facility")]
    UnknownFacility(String),
    #[error("cannot import facility '{name}': {message}")]
    LoadFailed { name: String, message: String },
}

pub struct CapabilityRegistry {
    entries: HashMap<String, Value>,
    facilities: HashMap<FacilityKind, FacilityHandle>,
    network: NetworkConfig,
    client: Option<Client>,
}

impl CapabilityRegistry {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            entries: HashMap::new(),
            facilities: HashMap::new(),
            network,
            client: None,
        }
    }

    /// Publish an entry under its full (prefixed) name.
    pub fn publish(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        debug!(name = %name, "publishing capability entry");
        self.entries.insert(name, value);
    }

    /// Look up a published entry by full name.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Handle of an already-loaded facility.
    pub fn loaded(&self, kind: FacilityKind) -> Option<&FacilityHandle> {
        self.facilities.get(&kind)
    }

    /// Number of published entries; grows monotonically.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Load a facility by name, publishing its wrapped operations on
    /// first load. Idempotent.
    pub fn ensure_loaded(&mut self, name: &str) -> Result<FacilityHandle, ImportError> {
        let kind = FacilityKind::from_str(name)
            .map_err(|_| ImportError::UnknownFacility(name.to_string()))?;

        if let Some(handle) = self.facilities.get(&kind) {
            debug!(facility = name, "facility already loaded");
            return Ok(handle.clone());
        }

        let raw_entries = self.build_facility(kind)?;
        let policy = kind.policy();
        for raw in raw_entries {
            let wrapped = policy::wrap(raw, policy);
            self.publish(wrapped.name().to_string(), Value::Native(wrapped));
        }

        let handle = FacilityHandle::new(kind);
        self.publish(
            format!("{}{}", CAPABILITY_PREFIX, name),
            Value::Facility(handle.clone()),
        );
        self.facilities.insert(kind, handle.clone());
        info!(facility = name, "facility loaded");
        Ok(handle)
    }

    /// Construct the raw callables for a facility's allow-listed
    /// operations.
    fn build_facility(
        &mut self,
        kind: FacilityKind,
    ) -> Result<Vec<super::native::NativeFunction>, ImportError> {
        let entries = match kind {
            FacilityKind::Requests => facilities::requests::entries(self.http_client(kind)?),
            FacilityKind::Urllib => facilities::urllib::entries(self.http_client(kind)?),
            FacilityKind::Json => facilities::json::entries(),
            FacilityKind::Time => facilities::time::entries(),
            FacilityKind::Datetime => facilities::datetime::entries(),
            FacilityKind::Random => facilities::random::entries(),
            FacilityKind::Base64 => facilities::base64::entries(),
            FacilityKind::Hashlib => facilities::hashlib::entries(),
            // raw handle only
            FacilityKind::Os | FacilityKind::Math => Vec::new(),
        };
        debug_assert!(entries
            .iter()
            .zip(kind.function_names())
            .all(|(entry, name)| entry.name() == *name));
        Ok(entries)
    }

    /// Shared HTTP client, built from the network configuration on first
    /// use. A build failure is a load failure for the importing facility.
    fn http_client(&mut self, kind: FacilityKind) -> Result<Client, ImportError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let mut builder = Client::builder().user_agent(self.network.user_agent.clone());
        if let Some(timeout) = self.network.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ImportError::LoadFailed {
            name: kind.to_string(),
            message: e.to_string(),
        })?;
        self.client = Some(client.clone());
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CapabilityRegistry {
        CapabilityRegistry::new(NetworkConfig::default())
    }

    #[test]
    fn test_unknown_facility_fails() {
        let err = registry().ensure_loaded("sockets").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot import facility 'sockets': unknown facility"
        );
    }

    #[test]
    fn test_load_publishes_prefixed_wrappers_and_alias() {
        let mut registry = registry();
        registry.ensure_loaded("time").unwrap();

        for bare in FacilityKind::Time.function_names() {
            let published = format!("{}{}", CAPABILITY_PREFIX, bare);
            match registry.lookup(&published) {
                Some(Value::Native(f)) => assert_eq!(f.name(), published),
                other => panic!("expected native entry for {}, got {:?}", published, other),
            }
        }
        assert!(matches!(
            registry.lookup("redtime"),
            Some(Value::Facility(_))
        ));
    }

    #[test]
    fn test_import_is_idempotent() {
        let mut registry = registry();
        let first = registry.ensure_loaded("hashlib").unwrap();
        let count = registry.entry_count();
        let second = registry.ensure_loaded("hashlib").unwrap();

        assert!(first.same_instance(&second));
        assert_eq!(registry.entry_count(), count);
    }

    #[test]
    fn test_unlisted_facility_gets_handle_only() {
        let mut registry = registry();
        let before = registry.entry_count();
        registry.ensure_loaded("os").unwrap();
        // only the handle alias is published
        assert_eq!(registry.entry_count(), before + 1);
        assert!(matches!(registry.lookup("redos"), Some(Value::Facility(_))));
    }

    #[test]
    fn test_distinct_facilities_get_distinct_handles() {
        let mut registry = registry();
        let time = registry.ensure_loaded("time").unwrap();
        let json = registry.ensure_loaded("json").unwrap();
        assert!(!time.same_instance(&json));
        assert_ne!(time, json);
    }
}
