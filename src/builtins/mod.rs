//! # Built-in Functions
//!
//! The fixed function set available to every script without any import:
//! the minimal core (output, input, length, conversions, type inspection)
//! plus the math/string/list/map/file utility set. All are published under
//! the `red` prefix by explicit enumeration at interpreter startup.
//!
//! Built-ins are registered raw — no wrapping policy — so their failures
//! surface to the per-statement failure handling, unlike facility
//! wrappers.

pub(crate) mod core;
pub(crate) mod files;
pub(crate) mod lists;
pub(crate) mod maps;
pub(crate) mod math;
pub(crate) mod strings;

use crate::capability::CapabilityRegistry;
use crate::value::Value;

/// Register every built-in into the registry's entry map.
pub fn install(registry: &mut CapabilityRegistry) {
    for entry in core::entries()
        .into_iter()
        .chain(math::entries())
        .chain(strings::entries())
        .chain(lists::entries())
        .chain(maps::entries())
        .chain(files::entries())
    {
        registry.publish(entry.name().to_string(), Value::Native(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;

    #[test]
    fn test_install_publishes_prefixed_names() {
        let mut registry = CapabilityRegistry::new(NetworkConfig::default());
        install(&mut registry);

        for name in [
            "redprint",
            "redinput",
            "redlen",
            "redint",
            "redstr",
            "redfloat",
            "redtype",
            "redabs",
            "redsplit",
            "redrange",
            "redkeys",
            "redread",
        ] {
            assert!(
                matches!(registry.lookup(name), Some(Value::Native(_))),
                "missing builtin {}",
                name
            );
        }
        assert!(registry.lookup("print").is_none());
    }
}
