//! Extension contracts: the type-erased call surface and the registry seam.
//!
//! A synthesized dispatcher satisfies its capability's full contract by
//! forwarding through a uniform, type-erased shape: arguments travel as
//! [`CallArg`] values and results come back as a [`CallOutcome`]. Concrete
//! extension implementations downcast the pieces they care about.
//!
//! The registry is an external collaborator. It owns instance loading and
//! caching; dispatchers only ask it to resolve a name.

use crate::carrier::{Carrier, CarrierSource, InvocationContext};
use crate::error::BoxError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A single type-erased argument of a capability call.
#[derive(Clone, Copy)]
pub enum CallArg<'a> {
    /// The caller passed nothing for this position.
    Absent,
    /// The config carrier itself.
    Carrier(&'a Carrier),
    /// An argument exposing the carrier through named accessors.
    Source(&'a dyn CarrierSource),
    /// The invocation context enabling per-operation overrides.
    Context(&'a dyn InvocationContext),
    /// Any other argument, forwarded untouched.
    Value(&'a (dyn Any + Send + Sync)),
}

impl fmt::Debug for CallArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallArg::Absent => f.write_str("Absent"),
            CallArg::Carrier(carrier) => f.debug_tuple("Carrier").field(carrier).finish(),
            CallArg::Source(_) => f.write_str("Source(..)"),
            CallArg::Context(ctx) => f.debug_tuple("Context").field(&ctx.operation_name()).finish(),
            CallArg::Value(_) => f.write_str("Value(..)"),
        }
    }
}

/// The outcome of a forwarded capability call.
pub enum CallOutcome {
    /// The operation declares no return value.
    Unit,
    /// A type-erased return value; callers downcast to the concrete type.
    Value(Box<dyn Any + Send + Sync>),
}

impl CallOutcome {
    /// Wrap a concrete return value.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        CallOutcome::Value(Box::new(value))
    }

    /// Whether the call produced no value.
    pub fn is_unit(&self) -> bool {
        matches!(self, CallOutcome::Unit)
    }

    /// Downcast the outcome to a concrete return type.
    ///
    /// Returns `None` for [`CallOutcome::Unit`] and on type mismatch.
    pub fn downcast<T: 'static>(self) -> Option<T> {
        match self {
            CallOutcome::Unit => None,
            CallOutcome::Value(boxed) => boxed.downcast::<T>().ok().map(|b| *b),
        }
    }
}

impl fmt::Debug for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallOutcome::Unit => f.write_str("Unit"),
            CallOutcome::Value(_) => f.write_str("Value(..)"),
        }
    }
}

/// A live extension instance implementing one capability.
///
/// Declared failures pass through dispatch unmodified as the boxed error.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot serve as an extension instance",
    label = "missing `Extension` implementation",
    note = "Implement `Extension` so the instance can be registered and dispatched to."
)]
pub trait Extension: Send + Sync {
    /// Invoke the named operation with the original call arguments.
    fn invoke(&self, operation: &str, args: &[CallArg<'_>]) -> Result<CallOutcome, BoxError>;
}

/// Resolves an extension name to a live instance.
///
/// Implementations own their locking and memoization discipline; a
/// dispatcher holds one handle for its whole lifetime and queries it once
/// per call.
pub trait ExtensionRegistry: Send + Sync {
    /// Look up the instance registered under `name` for `capability`.
    fn get(&self, capability: &str, name: &str) -> Option<Arc<dyn Extension>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_downcast_roundtrip() {
        let outcome = CallOutcome::value(41_u32);
        assert!(!outcome.is_unit());
        assert_eq!(outcome.downcast::<u32>(), Some(41));

        let outcome = CallOutcome::value("selected".to_owned());
        assert_eq!(outcome.downcast::<u32>(), None);
    }
}
