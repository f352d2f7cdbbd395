//! Key-chain name resolution.
//!
//! The heart of adaptive dispatch. An operation's ordered key list is folded
//! into a single [`NameExpr`] that resolves the extension name for one call:
//! the first key is the highest priority, each miss cascades down the chain,
//! and the innermost fallback is the capability's default extension name.
//! Operators can therefore override selection through the most specific key.
//!
//! Two keys are special-cased:
//!
//! - `protocol` is reserved: the carrier's intrinsic scheme field, not a
//!   generic parameter, is authoritative for it at any chain position.
//! - When the operation declares an invocation-context parameter, every
//!   non-protocol key resolves through the per-operation lookup
//!   `(operation, key)` before the plain key, enabling per-operation
//!   overrides.
//!
//! The expression is built once per operation at synthesis time and
//! evaluated once per invocation.

use pliant_core::{CapabilityType, Carrier, MethodDescriptor};

/// The reserved key resolved from the carrier's protocol field.
pub const PROTOCOL_KEY: &str = "protocol";

/// A name-resolution expression over the config carrier.
///
/// Built by folding the key chain from the last (lowest-priority) key to the
/// first; each earlier key wraps the previously built expression as its
/// fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameExpr {
    /// The capability's default extension name, when one is configured.
    Default,
    /// The carrier's protocol field, else the fallback.
    Protocol {
        /// Evaluated when the protocol field is unset.
        or_else: Box<NameExpr>,
    },
    /// A plain parameter lookup, else the fallback.
    Parameter {
        /// The configuration key to consult.
        key: String,
        /// Evaluated when the key is unset.
        or_else: Box<NameExpr>,
    },
    /// The per-operation lookup for `(operation, key)`, then the plain key,
    /// else the fallback.
    OperationParameter {
        /// The configuration key to consult.
        key: String,
        /// Evaluated when neither the override nor the plain key is set.
        or_else: Box<NameExpr>,
    },
}

impl NameExpr {
    /// Evaluate the expression against one call's carrier.
    ///
    /// `operation` is the current operation name taken from the invocation
    /// context, `default` the capability's configured default extension
    /// name. `None` means the chain cascaded all the way down unresolved.
    pub fn eval(
        &self,
        carrier: &Carrier,
        operation: Option<&str>,
        default: Option<&str>,
    ) -> Option<String> {
        match self {
            NameExpr::Default => default.filter(|d| !d.is_empty()).map(str::to_owned),
            NameExpr::Protocol { or_else } => carrier
                .protocol()
                .map(str::to_owned)
                .or_else(|| or_else.eval(carrier, operation, default)),
            NameExpr::Parameter { key, or_else } => carrier
                .parameter(key)
                .map(str::to_owned)
                .or_else(|| or_else.eval(carrier, operation, default)),
            NameExpr::OperationParameter { key, or_else } => operation
                .and_then(|op| carrier.operation_parameter(op, key))
                .map(str::to_owned)
                .or_else(|| or_else.eval(carrier, operation, default)),
        }
    }
}

/// The synthesized name-resolution plan for one adaptive operation: the key
/// chain it was built from plus the folded expression. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    keys: Vec<String>,
    expr: NameExpr,
}

impl DispatchPlan {
    /// The consulted key chain, highest priority first.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The folded resolution expression.
    pub fn expr(&self) -> &NameExpr {
        &self.expr
    }

    /// Resolve the extension name for one call.
    pub fn resolve(
        &self,
        carrier: &Carrier,
        operation: Option<&str>,
        default: Option<&str>,
    ) -> Option<String> {
        self.expr.eval(carrier, operation, default)
    }
}

/// The effective key chain for `method` on `capability`: the explicit list
/// when present, else a single key derived from the capability name by
/// splitting camel-case words with dots (`LoadBalance` -> `load.balance`).
pub fn effective_keys(capability: &CapabilityType, method: &MethodDescriptor) -> Vec<String> {
    if method.adaptive_keys().is_empty() {
        vec![camel_to_split_name(capability.name(), '.')]
    } else {
        method.adaptive_keys().to_vec()
    }
}

/// Fold the key chain, last to first, into the resolution plan.
pub fn build_plan(capability: &CapabilityType, method: &MethodDescriptor) -> DispatchPlan {
    let keys = effective_keys(capability, method);
    let has_context = method.context_position().is_some();

    let mut expr = NameExpr::Default;
    for key in keys.iter().rev() {
        expr = if key == PROTOCOL_KEY {
            NameExpr::Protocol {
                or_else: Box::new(expr),
            }
        } else if has_context {
            NameExpr::OperationParameter {
                key: key.clone(),
                or_else: Box::new(expr),
            }
        } else {
            NameExpr::Parameter {
                key: key.clone(),
                or_else: Box::new(expr),
            }
        };
    }

    DispatchPlan { keys, expr }
}

/// Split a camel-case name into lowercase words joined by `separator`.
pub fn camel_to_split_name(name: &str, separator: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for ch in name.chars() {
        if ch.is_uppercase() {
            if !out.is_empty() {
                out.push(separator);
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adaptive_capability(keys: &[&str], with_context: bool) -> CapabilityType {
        let mut method = MethodDescriptor::builder("select").carrier_param();
        if with_context {
            method = method.context_param();
        }
        let method = if keys.is_empty() {
            method.adaptive()
        } else {
            method.adaptive_with_keys(keys.iter().copied())
        };
        CapabilityType::builder("LoadBalance")
            .method(method.build().unwrap())
            .build()
            .unwrap()
    }

    fn plan_of(cap: &CapabilityType) -> DispatchPlan {
        build_plan(cap, &cap.methods()[0])
    }

    #[test]
    fn camel_case_splitting() {
        assert_eq!(camel_to_split_name("LoadBalance", '.'), "load.balance");
        assert_eq!(camel_to_split_name("Protocol", '.'), "protocol");
        assert_eq!(camel_to_split_name("HttpBinder", '.'), "http.binder");
    }

    #[test]
    fn empty_key_list_derives_from_capability_name() {
        let cap = adaptive_capability(&[], false);
        assert_eq!(plan_of(&cap).keys(), ["load.balance"]);
    }

    #[test]
    fn chain_cascades_in_priority_order() {
        let cap = adaptive_capability(&["k1", "k2", "k3"], false);
        let plan = plan_of(&cap);

        let all_set = Carrier::new()
            .with_parameter("k1", "one")
            .with_parameter("k2", "two")
            .with_parameter("k3", "three");
        assert_eq!(
            plan.resolve(&all_set, None, Some("dflt")),
            Some("one".to_owned())
        );

        let later_only = Carrier::new().with_parameter("k3", "three");
        assert_eq!(
            plan.resolve(&later_only, None, Some("dflt")),
            Some("three".to_owned())
        );

        let none_set = Carrier::new();
        assert_eq!(
            plan.resolve(&none_set, None, Some("dflt")),
            Some("dflt".to_owned())
        );
        assert_eq!(plan.resolve(&none_set, None, None), None);
    }

    #[test]
    fn protocol_key_reads_the_scheme_field() {
        let cap = adaptive_capability(&["cluster", "protocol", "transporter"], false);
        let plan = plan_of(&cap);

        // Mid-chain protocol key is authoritative over a parameter of the
        // same name.
        let carrier = Carrier::new()
            .with_protocol("dubbo")
            .with_parameter("protocol", "ignored");
        assert_eq!(
            plan.resolve(&carrier, None, Some("dflt")),
            Some("dubbo".to_owned())
        );

        // Without a scheme it falls through exactly as any other key.
        let carrier = Carrier::new().with_parameter("transporter", "netty");
        assert_eq!(
            plan.resolve(&carrier, None, Some("dflt")),
            Some("netty".to_owned())
        );
    }

    #[test]
    fn context_switches_to_operation_lookup() {
        let cap = adaptive_capability(&["loadbalance"], true);
        let plan = plan_of(&cap);

        let carrier = Carrier::new()
            .with_parameter("loadbalance", "roundrobin")
            .with_operation_parameter("invoke", "loadbalance", "leastactive");

        assert_eq!(
            plan.resolve(&carrier, Some("invoke"), Some("random")),
            Some("leastactive".to_owned())
        );
        assert_eq!(
            plan.resolve(&carrier, Some("export"), Some("random")),
            Some("roundrobin".to_owned())
        );
    }

    #[test]
    fn earlier_keys_chain_into_operation_lookup_fallback() {
        let cap = adaptive_capability(&["k1", "k2"], true);
        let plan = plan_of(&cap);

        // k1 misses for this operation, k2 resolves through its own lookup.
        let carrier = Carrier::new().with_operation_parameter("invoke", "k2", "picked");
        assert_eq!(
            plan.resolve(&carrier, Some("invoke"), Some("dflt")),
            Some("picked".to_owned())
        );
    }

    #[test]
    fn plan_construction_is_deterministic() {
        let cap = adaptive_capability(&["k1", "protocol"], true);
        assert_eq!(plan_of(&cap), plan_of(&cap));
    }
}
