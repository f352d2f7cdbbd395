//! The config carrier and call-time context contracts.
//!
//! A [`Carrier`] is the immutable key-value configuration object traveling
//! with every call; adaptive dispatch reads the extension name out of it.
//! Arguments that are not the carrier themselves can still expose one
//! through a named accessor via [`CarrierSource`], and per-operation
//! overrides are enabled by an [`InvocationContext`] argument naming the
//! operation being invoked.

use std::collections::HashMap;

/// An immutable key-value configuration object passed through calls.
///
/// Exposes a protocol/scheme field and query-like parameters. Empty values
/// are treated as unset, so resolution falls through to the next key in the
/// chain rather than selecting an extension with an empty name.
///
/// Per-operation overrides live in the same flat parameter space under
/// dotted keys: `with_operation_parameter("invoke", "loadbalance", ..)`
/// stores the entry `invoke.loadbalance`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carrier {
    protocol: Option<String>,
    parameters: HashMap<String, String>,
}

impl Carrier {
    /// Create an empty carrier with no protocol and no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the protocol/scheme field.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Set a plain parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Set a per-operation override for `(operation, key)`.
    pub fn with_operation_parameter(
        self,
        operation: &str,
        key: &str,
        value: impl Into<String>,
    ) -> Self {
        self.with_parameter(format!("{operation}.{key}"), value)
    }

    /// The protocol field, or `None` when unset or empty.
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref().filter(|p| !p.is_empty())
    }

    /// Look up a plain parameter, treating empty values as unset.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Look up the per-operation override for `(operation, key)`, falling
    /// back to the plain key.
    pub fn operation_parameter(&self, operation: &str, key: &str) -> Option<&str> {
        self.parameter(&format!("{operation}.{key}"))
            .or_else(|| self.parameter(key))
    }
}

/// Read access to a carrier owned by another call argument.
///
/// Implemented by argument types that carry their configuration indirectly,
/// the runtime half of an indirect carrier binding. The accessor is invoked
/// by name; `None` models both an unknown accessor and an accessor that
/// currently holds no carrier, and fails the call before any name
/// resolution is attempted.
pub trait CarrierSource: Send + Sync {
    /// Invoke the named zero-argument accessor.
    fn carrier(&self, accessor: &str) -> Option<&Carrier>;
}

/// Per-call context exposing the name of the operation being invoked.
///
/// Its presence in a method's parameter list switches key resolution to the
/// per-operation lookup, enabling operators to override extension selection
/// for a single operation.
pub trait InvocationContext: Send + Sync {
    /// Name of the operation currently being invoked.
    fn operation_name(&self) -> &str;
}

/// A minimal [`InvocationContext`] carrying only an operation name.
#[derive(Debug, Clone)]
pub struct NamedInvocation {
    operation: String,
}

impl NamedInvocation {
    /// Create a context for the given operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl InvocationContext for NamedInvocation {
    fn operation_name(&self) -> &str {
        &self.operation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_unset() {
        let carrier = Carrier::new()
            .with_protocol("")
            .with_parameter("loadbalance", "");
        assert_eq!(carrier.protocol(), None);
        assert_eq!(carrier.parameter("loadbalance"), None);
    }

    #[test]
    fn operation_parameter_falls_back_to_plain_key() {
        let carrier = Carrier::new()
            .with_parameter("loadbalance", "roundrobin")
            .with_operation_parameter("invoke", "loadbalance", "leastactive");

        assert_eq!(
            carrier.operation_parameter("invoke", "loadbalance"),
            Some("leastactive")
        );
        assert_eq!(
            carrier.operation_parameter("export", "loadbalance"),
            Some("roundrobin")
        );
        assert_eq!(carrier.operation_parameter("export", "cluster"), None);
    }
}
