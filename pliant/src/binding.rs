//! Config-carrier binding resolution.
//!
//! Resolved once per adaptive operation during synthesis: how will the
//! dispatcher obtain the [`Carrier`](pliant_core::Carrier) at call time?
//! Either some parameter *is* the carrier (direct binding), or a parameter's
//! type declares a zero-argument accessor yielding one (indirect binding).
//!
//! Candidate accessors are declared on the descriptor rather than discovered
//! by type introspection, and ties between candidates are broken
//! deterministically: the canonical `carrier` accessor wins outright,
//! otherwise the lowest parameter position and then the lexicographically
//! smallest accessor name.

use pliant_core::{CapabilityType, MethodDescriptor, SynthesisError};
use std::collections::HashMap;

/// The canonical accessor name, preferred over every other candidate.
pub const CANONICAL_CARRIER_ACCESSOR: &str = "carrier";

/// How a synthesized dispatcher obtains the config carrier for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCarrierBinding {
    /// The argument at `position` is the carrier itself.
    Direct {
        /// Zero-based argument position.
        position: usize,
    },
    /// The argument at `position` exposes the carrier through `accessor`.
    Indirect {
        /// Zero-based argument position.
        position: usize,
        /// The accessor to invoke on that argument.
        accessor: String,
    },
}

/// Resolve the carrier binding for one adaptive operation.
///
/// The first parameter flagged as the carrier is bound directly, with no
/// further search. Otherwise every parameter's declared accessors are
/// scanned; a later declaration of the same name shadows an earlier one
/// across parameters, matching the reference discovery order. When no
/// candidate exists at all the operation cannot be dispatched adaptively
/// and synthesis fails with [`SynthesisError::NoConfigCarrier`].
pub fn resolve_binding(
    capability: &CapabilityType,
    method: &MethodDescriptor,
) -> Result<ConfigCarrierBinding, SynthesisError> {
    if let Some(param) = method.parameters().iter().find(|p| p.is_config_carrier()) {
        return Ok(ConfigCarrierBinding::Direct {
            position: param.position(),
        });
    }

    let mut candidates: HashMap<&str, usize> = HashMap::new();
    for param in method.parameters() {
        for accessor in param.carrier_accessors() {
            if accessor_shape_ok(accessor) {
                candidates.insert(accessor.as_str(), param.position());
            }
        }
    }

    if let Some(&position) = candidates.get(CANONICAL_CARRIER_ACCESSOR) {
        return Ok(ConfigCarrierBinding::Indirect {
            position,
            accessor: CANONICAL_CARRIER_ACCESSOR.to_owned(),
        });
    }

    match candidates
        .into_iter()
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
    {
        Some((accessor, position)) => Ok(ConfigCarrierBinding::Indirect {
            position,
            accessor: accessor.to_owned(),
        }),
        None => Err(SynthesisError::NoConfigCarrier {
            capability: capability.name().to_owned(),
            method: method.name().to_owned(),
        }),
    }
}

/// An accessor qualifies when its name carries an accessor-style prefix or
/// exceeds three characters.
fn accessor_shape_ok(name: &str) -> bool {
    name.starts_with("get") || name.len() > 3
}
