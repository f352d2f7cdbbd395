//! # pliant
//!
//! Adaptive dispatcher synthesis for pluggable capability interfaces.
//!
//! A capability is an abstract interface whose operations may be *adaptive*:
//! the concrete implementation handling a call is chosen at invocation time
//! from a configuration object traveling with the call, not wired
//! statically. Given a capability's descriptor, this crate synthesizes a
//! dispatcher that, per call, extracts an extension name from the config
//! carrier, resolves it through a registry and forwards the invocation.
//!
//! # Three-Stage Synthesis
//!
//! ## Stage 1: Carrier Binding ([`binding`])
//!
//! Each adaptive operation must be able to reach the carrier at call time.
//! The binding is resolved once during synthesis: either a parameter *is*
//! the carrier, or some parameter exposes it through a declared accessor.
//!
//! ## Stage 2: Key-Chain Folding ([`keychain`])
//!
//! The operation's ordered key list is folded, last to first, into a single
//! resolution expression: the highest-priority key is checked first and each
//! miss cascades to the next key, ending at the capability's default
//! extension name. The reserved key `protocol` reads the carrier's intrinsic
//! scheme field instead of a parameter.
//!
//! ## Stage 3: Dispatcher Assembly ([`synthesize`])
//!
//! The bindings and plans for every operation are composed into one
//! immutable [`Dispatcher`] per capability type. Non-adaptive operations get
//! stubs that fail loudly at call time, keeping the full capability contract
//! satisfied.
//!
//! The reference technique for this problem is generating and compiling
//! program text at call-setup time; here the descriptor is compiled into a
//! plan evaluated per invocation, with identical runtime semantics and no
//! runtime compiler.
//!
//! # Collaborators
//!
//! The extension registry is external: it maps `(capability, name)` to a
//! live instance and owns caching. [`MapRegistry`] is the standard in-memory
//! implementation; [`DispatcherCache`] memoizes synthesized dispatchers
//! process-wide until an explicit reset.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod binding;
pub mod cache;
pub mod keychain;
pub mod registry;
pub mod synthesize;
pub mod testing;

// Re-export the core contracts so most users depend on `pliant` alone.
pub use pliant_core::{
    BoxError, CallArg, CallOutcome, CapabilityBuilder, CapabilityType, Carrier, CarrierSource,
    DescriptorError, DispatchError, Extension, ExtensionRegistry, InvocationContext,
    MethodBuilder, MethodDescriptor, NamedInvocation, ParameterDescriptor, SynthesisError,
};

pub use binding::ConfigCarrierBinding;
pub use cache::DispatcherCache;
pub use keychain::{DispatchPlan, NameExpr};
pub use registry::{MapRegistry, MapRegistryBuilder, RegistryBuildError};
pub use synthesize::{Dispatcher, Synthesizer};
