//! Error types for Pliant.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`DescriptorError`] - Malformed descriptor input, rejected while building
//! - [`SynthesisError`] - Generation-time failures during dispatcher synthesis
//! - [`DispatchError`] - Invocation-time failures from a synthesized dispatcher
//!
//! Generation-time errors are fatal and non-retriable: they indicate a
//! malformed capability definition, a programming error rather than a
//! transient condition. Invocation-time errors are surfaced synchronously
//! to the caller; the only built-in fallback is the key chain's own cascade.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while assembling capability descriptors.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// The capability name was empty.
    #[error("capability name must not be empty")]
    EmptyCapabilityName,

    /// A method name was empty.
    #[error("method name must not be empty")]
    EmptyMethodName,

    /// Two methods on the same capability share a name.
    #[error("capability `{capability}` declares method `{method}` more than once")]
    DuplicateMethod {
        /// The capability being built.
        capability: String,
        /// The repeated method name.
        method: String,
    },

    /// A method declared more than one direct config-carrier parameter.
    #[error("method `{method}` declares more than one config-carrier parameter")]
    DuplicateCarrier {
        /// The offending method name.
        method: String,
    },
}

/// Generation-time failures during dispatcher synthesis.
///
/// All variants are fatal for the capability type (or method) in question.
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// The capability declares no adaptive operation at all.
    #[error("no adaptive operation on capability `{capability}`, refusing to synthesize a dispatcher")]
    NotAdaptiveCapability {
        /// The capability that was rejected.
        capability: String,
    },

    /// No parameter of the method is the carrier and none exposes one.
    #[error("no config carrier reachable from the parameters of `{capability}::{method}`")]
    NoConfigCarrier {
        /// The capability being synthesized.
        capability: String,
        /// The method with no reachable carrier.
        method: String,
    },
}

/// Invocation-time failures surfaced by a synthesized dispatcher.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The operation exists but is not adaptive; the dispatcher only carries
    /// a stub for it.
    #[error("operation `{method}` of capability `{capability}` is not adaptive")]
    NotAdaptiveMethod {
        /// The capability the dispatcher was synthesized for.
        capability: String,
        /// The non-adaptive operation that was invoked.
        method: String,
    },

    /// The dispatcher was asked for an operation its descriptor never declared.
    #[error("capability `{capability}` has no operation named `{method}`")]
    UnknownMethod {
        /// The capability the dispatcher was synthesized for.
        capability: String,
        /// The undeclared operation name.
        method: String,
    },

    /// The key chain cascaded all the way down without producing a name.
    #[error("failed to resolve an extension name for `{capability}::{method}` using keys {keys:?}")]
    UnresolvedExtensionName {
        /// The capability the dispatcher was synthesized for.
        capability: String,
        /// The operation being dispatched.
        method: String,
        /// The key chain that was consulted, highest priority first.
        keys: Vec<String>,
    },

    /// The config carrier could not be acquired from the call arguments.
    #[error("invalid config carrier for `{capability}::{method}`: {detail}")]
    InvalidConfigCarrier {
        /// The capability the dispatcher was synthesized for.
        capability: String,
        /// The operation being dispatched.
        method: String,
        /// Which hop of the acquisition failed.
        detail: String,
    },

    /// The invocation-context argument was missing or not a context.
    #[error("invocation context argument for `{capability}::{method}` is missing")]
    InvalidInvocationContext {
        /// The capability the dispatcher was synthesized for.
        capability: String,
        /// The operation being dispatched.
        method: String,
    },

    /// The registry has no extension under the resolved name.
    #[error("no extension named `{name}` is registered for capability `{capability}`")]
    ExtensionNotFound {
        /// The capability the lookup was scoped to.
        capability: String,
        /// The resolved extension name that was not found.
        name: String,
    },

    /// A failure raised by the resolved extension, passed through unmodified.
    #[error(transparent)]
    Extension(BoxError),
}
