//! # pliant-core
//!
//! Core contracts for the Pliant adaptive dispatch framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! extension providers that don't need the synthesis machinery in `pliant`.
//!
//! # What lives here
//!
//! ## Descriptors ([`CapabilityType`])
//!
//! The metadata describing a pluggable capability: its operations, their
//! parameters, which operations are adaptive and under which configuration
//! keys. Descriptors are built once through validating builders and never
//! mutated afterwards.
//!
//! ## Call-time contracts ([`Carrier`], [`InvocationContext`])
//!
//! The immutable key-value configuration object traveling with each call,
//! the accessor seam for arguments that expose a carrier indirectly
//! ([`CarrierSource`]), and the per-call context naming the operation being
//! invoked.
//!
//! ## Extension seam ([`Extension`], [`ExtensionRegistry`])
//!
//! The type-erased call surface a synthesized dispatcher forwards through,
//! and the registry interface that maps (capability, name) to a live
//! instance. The registry is an external collaborator: it owns loading and
//! instance caching, dispatchers only query it.
//!
//! # Error Types
//!
//! - [`DescriptorError`] - Malformed descriptor input, rejected at build time
//! - [`SynthesisError`] - Generation-time failures, fatal and non-retriable
//! - [`DispatchError`] - Invocation-time failures surfaced to the caller

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod carrier;
mod descriptor;
mod error;
mod extension;

// Re-exports
pub use carrier::{Carrier, CarrierSource, InvocationContext, NamedInvocation};
pub use descriptor::{
    CapabilityBuilder, CapabilityType, MethodBuilder, MethodDescriptor, ParameterDescriptor,
};
pub use error::{BoxError, DescriptorError, DispatchError, SynthesisError};
pub use extension::{CallArg, CallOutcome, Extension, ExtensionRegistry};
