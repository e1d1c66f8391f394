//! Execution context: the session object threaded through every
//! component in place of global interpreter state.

use std::collections::HashMap;

use tracing::debug;

use crate::builtins;
use crate::capability::{CapabilityRegistry, FacilityHandle, ImportError};
use crate::config::RuntimeConfig;
use crate::value::Value;

/// Owns the variable store and the capability registry for one run.
///
/// Identifier resolution follows the namespace layering: the variable
/// store shadows registry entries, and registry entries are the only other
/// source of names.
pub struct ExecutionContext {
    variables: HashMap<String, Value>,
    registry: CapabilityRegistry,
    max_loop_iterations: Option<u64>,
}

impl ExecutionContext {
    pub fn new(config: &RuntimeConfig) -> Self {
        let mut registry = CapabilityRegistry::new(config.network.clone());
        builtins::install(&mut registry);
        Self {
            variables: HashMap::new(),
            registry,
            max_loop_iterations: config.max_loop_iterations,
        }
    }

    /// Resolve a name: variable bindings first, then published entries.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        self.variables
            .get(name)
            .or_else(|| self.registry.lookup(name))
            .cloned()
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn get_variable_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.variables.get_mut(name)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        debug!(name = %name, kind = value.type_name(), "binding variable");
        self.variables.insert(name, value);
    }

    /// Load a facility and bind its bare name as a variable, so later
    /// statements can reference it unprefixed.
    pub fn import_facility(&mut self, name: &str) -> Result<FacilityHandle, ImportError> {
        let handle = self.registry.ensure_loaded(name)?;
        self.variables
            .insert(name.to_string(), Value::Facility(handle.clone()));
        Ok(handle)
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn max_loop_iterations(&self) -> Option<u64> {
        self.max_loop_iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ExecutionContext {
        ExecutionContext::new(&RuntimeConfig::default())
    }

    #[test]
    fn test_variables_shadow_registry_entries() {
        let mut ctx = context();
        assert!(matches!(ctx.resolve("redlen"), Some(Value::Native(_))));

        ctx.set_variable("redlen", Value::Integer(1));
        assert_eq!(ctx.resolve("redlen"), Some(Value::Integer(1)));
    }

    #[test]
    fn test_import_binds_bare_name() {
        let mut ctx = context();
        assert_eq!(ctx.resolve("time"), None);

        let handle = ctx.import_facility("time").unwrap();
        assert_eq!(ctx.resolve("time"), Some(Value::Facility(handle)));
        assert!(matches!(ctx.resolve("redsleep"), Some(Value::Native(_))));
    }

    #[test]
    fn test_unresolved_name() {
        assert_eq!(context().resolve("nope"), None);
    }
}
