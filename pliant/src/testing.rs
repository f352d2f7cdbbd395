//! Testing utilities for Pliant.
//!
//! This module provides fixtures that make dispatcher and registry tests
//! easier to write:
//!
//! - [`NamedExtension`]: an extension that answers with its own name,
//!   identifying which instance a dispatcher selected
//! - [`RecordingExtension`]: an extension that records every forwarded call
//! - [`AccessorSource`]: a programmable [`CarrierSource`] for indirect
//!   binding tests

use pliant_core::{BoxError, CallArg, CallOutcome, Carrier, CarrierSource, Extension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Named Extension
// ============================================================================

/// An extension that returns its own name from every operation.
///
/// Registering several of these under different names makes it trivial to
/// assert which instance a resolved call was forwarded to.
#[derive(Debug, Clone)]
pub struct NamedExtension {
    name: String,
}

impl NamedExtension {
    /// Create an extension answering with `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Extension for NamedExtension {
    fn invoke(&self, _operation: &str, _args: &[CallArg<'_>]) -> Result<CallOutcome, BoxError> {
        Ok(CallOutcome::value(self.name.clone()))
    }
}

// ============================================================================
// Recording Extension
// ============================================================================

/// An extension that records the operation name and argument count of every
/// forwarded call. Clones share the same log.
pub struct RecordingExtension {
    calls: Arc<Mutex<Vec<(String, usize)>>>,
    error: Option<String>,
}

impl RecordingExtension {
    /// Create a recording extension that always succeeds.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    /// Create a recording extension that fails every call with `error`.
    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            error: Some(error.into()),
        }
    }

    /// The recorded calls, in order.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of forwarded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for RecordingExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RecordingExtension {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
            error: self.error.clone(),
        }
    }
}

impl Extension for RecordingExtension {
    fn invoke(&self, operation: &str, args: &[CallArg<'_>]) -> Result<CallOutcome, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_owned(), args.len()));
        match &self.error {
            Some(error) => Err(error.clone().into()),
            None => Ok(CallOutcome::Unit),
        }
    }
}

// ============================================================================
// Accessor Source
// ============================================================================

/// A programmable [`CarrierSource`] mapping accessor names to carriers.
///
/// Accessors that were not programmed yield `None`, which a dispatcher
/// treats as a failed hop.
#[derive(Debug, Clone, Default)]
pub struct AccessorSource {
    carriers: HashMap<String, Carrier>,
}

impl AccessorSource {
    /// Create a source with no accessors programmed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Program `accessor` to yield `carrier`.
    pub fn with_carrier(mut self, accessor: impl Into<String>, carrier: Carrier) -> Self {
        self.carriers.insert(accessor.into(), carrier);
        self
    }
}

impl CarrierSource for AccessorSource {
    fn carrier(&self, accessor: &str) -> Option<&Carrier> {
        self.carriers.get(accessor)
    }
}
