//! Dispatcher synthesis.
//!
//! Composes the carrier binding and the key-chain plan of every operation
//! into one immutable [`Dispatcher`] per capability type. The reference
//! behavior for this problem generates and compiles program text at
//! call-setup time; here the same descriptor is compiled into a plan that a
//! plain function evaluates per invocation.
//!
//! Synthesis is a pure query: it reads the immutable descriptor, performs no
//! I/O, never touches the registry and is safe to run concurrently. Callers
//! are expected to run it at most once per capability type, typically
//! through [`DispatcherCache`](crate::DispatcherCache).

use crate::binding::{self, ConfigCarrierBinding};
use crate::keychain::{self, DispatchPlan};
use pliant_core::{
    CallArg, CallOutcome, CapabilityType, Carrier, DispatchError, ExtensionRegistry,
    SynthesisError,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Synthesizes adaptive dispatchers from capability descriptors.
///
/// The registry handle and the per-capability default extension names are
/// explicit constructor inputs; nothing here is process-global.
pub struct Synthesizer {
    registry: Arc<dyn ExtensionRegistry>,
    defaults: HashMap<String, String>,
}

impl Synthesizer {
    /// Create a synthesizer that wires dispatchers to `registry`.
    pub fn new(registry: Arc<dyn ExtensionRegistry>) -> Self {
        Self {
            registry,
            defaults: HashMap::new(),
        }
    }

    /// Set the default extension name for a capability type, keyed by its
    /// namespace-qualified name.
    pub fn default_name(
        mut self,
        capability: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.defaults.insert(capability.into(), name.into());
        self
    }

    /// Whether a dispatcher can be synthesized for `capability`.
    pub fn supports_adaptive(capability: &CapabilityType) -> bool {
        capability.has_adaptive_method()
    }

    /// Synthesize the dispatcher for `capability`.
    ///
    /// Fails with [`SynthesisError::NotAdaptiveCapability`] when no
    /// operation carries the adaptive marker, and with
    /// [`SynthesisError::NoConfigCarrier`] when an adaptive operation has no
    /// way to reach the carrier. Deterministic for structurally identical
    /// descriptors.
    pub fn synthesize(&self, capability: &CapabilityType) -> Result<Dispatcher, SynthesisError> {
        if !Self::supports_adaptive(capability) {
            return Err(SynthesisError::NotAdaptiveCapability {
                capability: capability.qualified_name(),
            });
        }

        let mut methods = HashMap::new();
        for method in capability.methods() {
            let dispatch = if method.is_adaptive() {
                let binding = binding::resolve_binding(capability, method)?;
                let plan = keychain::build_plan(capability, method);
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    capability = %capability.qualified_name(),
                    method = method.name(),
                    keys = ?plan.keys(),
                    ?binding,
                    "synthesized adaptive plan"
                );
                MethodDispatch::Adaptive(AdaptivePlan {
                    binding,
                    context_position: method.context_position(),
                    returns_value: method.returns_value(),
                    plan,
                })
            } else {
                MethodDispatch::NotAdaptive
            };
            methods.insert(method.name().to_owned(), dispatch);
        }

        Ok(Dispatcher {
            capability: capability.name().to_owned(),
            default_name: self.defaults.get(&capability.qualified_name()).cloned(),
            registry: Arc::clone(&self.registry),
            methods,
        })
    }
}

/// A synthesized per-capability dispatcher.
///
/// Immutable and safe for unsynchronized concurrent invocation. Holds the
/// per-operation plans, the registry handle and the default extension name
/// captured at synthesis time.
pub struct Dispatcher {
    capability: String,
    default_name: Option<String>,
    registry: Arc<dyn ExtensionRegistry>,
    methods: HashMap<String, MethodDispatch>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut operations: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        operations.sort_unstable();
        f.debug_struct("Dispatcher")
            .field("capability", &self.capability)
            .field("default_name", &self.default_name)
            .field("operations", &operations)
            .finish_non_exhaustive()
    }
}

enum MethodDispatch {
    NotAdaptive,
    Adaptive(AdaptivePlan),
}

struct AdaptivePlan {
    binding: ConfigCarrierBinding,
    context_position: Option<usize>,
    returns_value: bool,
    plan: DispatchPlan,
}

impl Dispatcher {
    /// The capability this dispatcher was synthesized for.
    pub fn capability(&self) -> &str {
        &self.capability
    }

    /// The default extension name captured at synthesis time.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Dispatch one call.
    ///
    /// Acquires the carrier per the operation's binding, resolves the
    /// extension name through the key chain, looks the instance up in the
    /// registry and forwards the original arguments. The instance's result
    /// and failures pass through unchanged, except that operations declared
    /// with no return value normalize the outcome to [`CallOutcome::Unit`].
    pub fn invoke(
        &self,
        operation: &str,
        args: &[CallArg<'_>],
    ) -> Result<CallOutcome, DispatchError> {
        let plan = self.adaptive_plan(operation)?;
        let name = self.resolve_with(plan, operation, args)?;

        let Some(extension) = self.registry.get(&self.capability, &name) else {
            return Err(DispatchError::ExtensionNotFound {
                capability: self.capability.clone(),
                name,
            });
        };

        let outcome = extension
            .invoke(operation, args)
            .map_err(DispatchError::Extension)?;
        if plan.returns_value {
            Ok(outcome)
        } else {
            Ok(CallOutcome::Unit)
        }
    }

    /// Resolve the extension name `operation` would dispatch to for `args`,
    /// without forwarding anything.
    pub fn resolve_name(
        &self,
        operation: &str,
        args: &[CallArg<'_>],
    ) -> Result<String, DispatchError> {
        let plan = self.adaptive_plan(operation)?;
        self.resolve_with(plan, operation, args)
    }

    fn adaptive_plan(&self, operation: &str) -> Result<&AdaptivePlan, DispatchError> {
        match self.methods.get(operation) {
            Some(MethodDispatch::Adaptive(plan)) => Ok(plan),
            Some(MethodDispatch::NotAdaptive) => Err(DispatchError::NotAdaptiveMethod {
                capability: self.capability.clone(),
                method: operation.to_owned(),
            }),
            None => Err(DispatchError::UnknownMethod {
                capability: self.capability.clone(),
                method: operation.to_owned(),
            }),
        }
    }

    fn resolve_with(
        &self,
        plan: &AdaptivePlan,
        operation: &str,
        args: &[CallArg<'_>],
    ) -> Result<String, DispatchError> {
        let carrier = self.acquire_carrier(plan, operation, args)?;

        let current_operation = match plan.context_position {
            Some(position) => match args.get(position).copied() {
                Some(CallArg::Context(ctx)) => Some(ctx.operation_name()),
                _ => {
                    return Err(DispatchError::InvalidInvocationContext {
                        capability: self.capability.clone(),
                        method: operation.to_owned(),
                    });
                }
            },
            None => None,
        };

        plan.plan
            .resolve(carrier, current_operation, self.default_name.as_deref())
            .ok_or_else(|| DispatchError::UnresolvedExtensionName {
                capability: self.capability.clone(),
                method: operation.to_owned(),
                keys: plan.plan.keys().to_vec(),
            })
    }

    fn acquire_carrier<'a>(
        &self,
        plan: &AdaptivePlan,
        operation: &str,
        args: &[CallArg<'a>],
    ) -> Result<&'a Carrier, DispatchError> {
        let invalid = |detail: String| DispatchError::InvalidConfigCarrier {
            capability: self.capability.clone(),
            method: operation.to_owned(),
            detail,
        };

        match &plan.binding {
            ConfigCarrierBinding::Direct { position } => match args.get(*position).copied() {
                Some(CallArg::Carrier(carrier)) => Ok(carrier),
                Some(CallArg::Absent) | None => {
                    Err(invalid(format!("carrier argument {position} is missing")))
                }
                Some(_) => Err(invalid(format!(
                    "argument {position} is not the config carrier"
                ))),
            },
            ConfigCarrierBinding::Indirect { position, accessor } => {
                match args.get(*position).copied() {
                    Some(CallArg::Source(source)) => source.carrier(accessor).ok_or_else(|| {
                        invalid(format!(
                            "accessor `{accessor}` on argument {position} yielded no carrier"
                        ))
                    }),
                    Some(CallArg::Absent) | None => {
                        Err(invalid(format!("argument {position} is missing")))
                    }
                    Some(_) => Err(invalid(format!(
                        "argument {position} exposes no carrier accessors"
                    ))),
                }
            }
        }
    }
}
