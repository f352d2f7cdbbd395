//! Descriptor model for capability types.
//!
//! Descriptors are the metadata input to dispatcher synthesis: which
//! operations a capability declares, their parameter shapes, which of them
//! are adaptive and under which configuration keys. They are assembled once
//! through validating builders and immutable afterwards; the synthesizer
//! treats them as a pure query surface.
//!
//! Instead of runtime type introspection, parameters declare up front which
//! of their accessors yield a [`Carrier`](crate::Carrier): the
//! `carrier_accessors` list, matched at call time through
//! [`CarrierSource`](crate::CarrierSource).

use crate::error::DescriptorError;

/// A pluggable capability interface: a name, an optional namespace and an
/// ordered list of operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityType {
    name: String,
    namespace: Option<String>,
    methods: Vec<MethodDescriptor>,
}

impl CapabilityType {
    /// Start building a capability descriptor.
    pub fn builder(name: impl Into<String>) -> CapabilityBuilder {
        CapabilityBuilder {
            name: name.into(),
            namespace: None,
            methods: Vec::new(),
        }
    }

    /// The capability's simple name, e.g. `LoadBalance`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace, if one was declared.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The namespace-qualified name used in diagnostics.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}::{}", self.name),
            None => self.name.clone(),
        }
    }

    /// The declared operations, in declaration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Look up an operation by name.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Whether at least one operation carries the adaptive marker.
    pub fn has_adaptive_method(&self) -> bool {
        self.methods.iter().any(MethodDescriptor::is_adaptive)
    }
}

/// Builder for [`CapabilityType`].
pub struct CapabilityBuilder {
    name: String,
    namespace: Option<String>,
    methods: Vec<MethodDescriptor>,
}

impl CapabilityBuilder {
    /// Declare the capability's namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add an operation.
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Validate and build the descriptor.
    pub fn build(self) -> Result<CapabilityType, DescriptorError> {
        if self.name.is_empty() {
            return Err(DescriptorError::EmptyCapabilityName);
        }
        for (i, method) in self.methods.iter().enumerate() {
            if self.methods[..i].iter().any(|m| m.name == method.name) {
                return Err(DescriptorError::DuplicateMethod {
                    capability: self.name.clone(),
                    method: method.name.clone(),
                });
            }
        }
        Ok(CapabilityType {
            name: self.name,
            namespace: self.namespace,
            methods: self.methods,
        })
    }
}

/// One operation of a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    parameters: Vec<ParameterDescriptor>,
    returns_value: bool,
    failures: Vec<String>,
    adaptive: bool,
    adaptive_keys: Vec<String>,
}

impl MethodDescriptor {
    /// Start building an operation descriptor.
    pub fn builder(name: impl Into<String>) -> MethodBuilder {
        MethodBuilder {
            name: name.into(),
            parameters: Vec::new(),
            returns_value: true,
            failures: Vec::new(),
            adaptive: false,
            adaptive_keys: Vec::new(),
        }
    }

    /// The operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parameters, positions matching declaration order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Whether the operation produces a value (`false` for "no value").
    pub fn returns_value(&self) -> bool {
        self.returns_value
    }

    /// Declared failure types, passed through dispatch unmodified.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Whether the operation carries the adaptive marker.
    pub fn is_adaptive(&self) -> bool {
        self.adaptive
    }

    /// The explicit key chain; empty means "derive from the capability name".
    pub fn adaptive_keys(&self) -> &[String] {
        &self.adaptive_keys
    }

    /// Position of the invocation-context parameter, if one was declared.
    /// The first one wins when several are present.
    pub fn context_position(&self) -> Option<usize> {
        self.parameters
            .iter()
            .find(|p| p.is_invocation_context)
            .map(|p| p.position)
    }
}

/// Builder for [`MethodDescriptor`]. Parameter positions are assigned in
/// declaration order.
pub struct MethodBuilder {
    name: String,
    parameters: Vec<ParameterDescriptor>,
    returns_value: bool,
    failures: Vec<String>,
    adaptive: bool,
    adaptive_keys: Vec<String>,
}

impl MethodBuilder {
    /// Add a parameter that *is* the config carrier.
    pub fn carrier_param(self) -> Self {
        self.push(ParameterDescriptor {
            position: 0,
            type_name: "Carrier".to_owned(),
            is_config_carrier: true,
            is_invocation_context: false,
            carrier_accessors: Vec::new(),
        })
    }

    /// Add the invocation-context parameter.
    pub fn context_param(self) -> Self {
        self.push(ParameterDescriptor {
            position: 0,
            type_name: "InvocationContext".to_owned(),
            is_config_carrier: false,
            is_invocation_context: true,
            carrier_accessors: Vec::new(),
        })
    }

    /// Add an opaque parameter, forwarded untouched.
    pub fn value_param(self, type_name: impl Into<String>) -> Self {
        self.push(ParameterDescriptor {
            position: 0,
            type_name: type_name.into(),
            is_config_carrier: false,
            is_invocation_context: false,
            carrier_accessors: Vec::new(),
        })
    }

    /// Add a parameter whose type exposes the carrier through the named
    /// zero-argument accessors.
    pub fn source_param<I, S>(self, type_name: impl Into<String>, accessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(ParameterDescriptor {
            position: 0,
            type_name: type_name.into(),
            is_config_carrier: false,
            is_invocation_context: false,
            carrier_accessors: accessors.into_iter().map(Into::into).collect(),
        })
    }

    /// Declare that the operation produces no value.
    pub fn returns_nothing(mut self) -> Self {
        self.returns_value = false;
        self
    }

    /// Declare a failure type the operation may raise.
    pub fn failure(mut self, type_name: impl Into<String>) -> Self {
        self.failures.push(type_name.into());
        self
    }

    /// Mark the operation adaptive with the derived key.
    pub fn adaptive(mut self) -> Self {
        self.adaptive = true;
        self
    }

    /// Mark the operation adaptive with an explicit key chain, highest
    /// priority first.
    pub fn adaptive_with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.adaptive = true;
        self.adaptive_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and build the descriptor.
    pub fn build(self) -> Result<MethodDescriptor, DescriptorError> {
        if self.name.is_empty() {
            return Err(DescriptorError::EmptyMethodName);
        }
        let carriers = self
            .parameters
            .iter()
            .filter(|p| p.is_config_carrier)
            .count();
        if carriers > 1 {
            return Err(DescriptorError::DuplicateCarrier { method: self.name });
        }
        Ok(MethodDescriptor {
            name: self.name,
            parameters: self.parameters,
            returns_value: self.returns_value,
            failures: self.failures,
            adaptive: self.adaptive,
            adaptive_keys: self.adaptive_keys,
        })
    }

    fn push(mut self, mut param: ParameterDescriptor) -> Self {
        param.position = self.parameters.len();
        self.parameters.push(param);
        self
    }
}

/// One parameter of a capability operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    position: usize,
    type_name: String,
    is_config_carrier: bool,
    is_invocation_context: bool,
    carrier_accessors: Vec<String>,
}

impl ParameterDescriptor {
    /// Zero-based position in the operation's parameter list.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The declared type identity, used in diagnostics only.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether this parameter is the config carrier itself.
    pub fn is_config_carrier(&self) -> bool {
        self.is_config_carrier
    }

    /// Whether this parameter exposes the current operation's name.
    pub fn is_invocation_context(&self) -> bool {
        self.is_invocation_context
    }

    /// Accessors declared on the parameter's type that yield the carrier.
    pub fn carrier_accessors(&self) -> &[String] {
        &self.carrier_accessors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assigns_positions_in_order() {
        let method = MethodDescriptor::builder("select")
            .value_param("InvokerList")
            .carrier_param()
            .context_param()
            .adaptive()
            .build()
            .unwrap();

        let positions: Vec<_> = method.parameters().iter().map(|p| p.position()).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert!(method.parameters()[1].is_config_carrier());
        assert_eq!(method.context_position(), Some(2));
    }

    #[test]
    fn second_carrier_parameter_is_rejected() {
        let err = MethodDescriptor::builder("select")
            .carrier_param()
            .carrier_param()
            .build()
            .unwrap_err();
        assert!(matches!(err, DescriptorError::DuplicateCarrier { .. }));
    }

    #[test]
    fn duplicate_method_names_are_rejected() {
        let select = || {
            MethodDescriptor::builder("select")
                .carrier_param()
                .adaptive()
                .build()
                .unwrap()
        };
        let err = CapabilityType::builder("LoadBalance")
            .method(select())
            .method(select())
            .build()
            .unwrap_err();
        assert!(matches!(err, DescriptorError::DuplicateMethod { .. }));
    }

    #[test]
    fn qualified_name_includes_namespace() {
        let cap = CapabilityType::builder("LoadBalance")
            .namespace("cluster")
            .build()
            .unwrap();
        assert_eq!(cap.qualified_name(), "cluster::LoadBalance");
    }
}
