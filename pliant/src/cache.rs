//! Process-wide dispatcher cache.
//!
//! Synthesis runs at most once per capability type, typically lazily on
//! first use. This cache memoizes the synthesized dispatcher per capability
//! name; only an explicit [`reset`](DispatcherCache::reset) invalidates it.

use crate::synthesize::{Dispatcher, Synthesizer};
use pliant_core::{CapabilityType, SynthesisError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Memoizes synthesized dispatchers by namespace-qualified capability name.
///
/// Safe for concurrent use. Two racing first calls may both synthesize, but
/// synthesis is deterministic and side-effect free, so either result is
/// kept and the semantics are identical.
pub struct DispatcherCache {
    synthesizer: Synthesizer,
    dispatchers: RwLock<HashMap<String, Arc<Dispatcher>>>,
}

impl DispatcherCache {
    /// Create a cache around `synthesizer`.
    pub fn new(synthesizer: Synthesizer) -> Self {
        Self {
            synthesizer,
            dispatchers: RwLock::new(HashMap::new()),
        }
    }

    /// Get the dispatcher for `capability`, synthesizing it on first use.
    pub fn dispatcher(
        &self,
        capability: &CapabilityType,
    ) -> Result<Arc<Dispatcher>, SynthesisError> {
        {
            let cached = self.dispatchers.read().unwrap_or_else(|e| e.into_inner());
            if let Some(found) = cached.get(&capability.qualified_name()) {
                return Ok(Arc::clone(found));
            }
        }

        let built = Arc::new(self.synthesizer.synthesize(capability)?);
        let mut cached = self.dispatchers.write().unwrap_or_else(|e| e.into_inner());
        let entry = cached.entry(capability.qualified_name()).or_insert(built);
        Ok(Arc::clone(entry))
    }

    /// Drop every cached dispatcher.
    pub fn reset(&self) {
        self.dispatchers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Number of cached dispatchers.
    pub fn len(&self) -> usize {
        self.dispatchers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
