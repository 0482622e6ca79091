//! Distance lookup results and the failure taxonomy of the distance provider.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Driving distance between two addresses. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub distance_km: Decimal,
    /// Human-readable duration exactly as the provider returned it.
    pub duration_text: String,
}

/// Errors returned by a [`crate::DistanceProvider`].
///
/// All variants are recoverable at the caller level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
    /// An input was empty; no request was made.
    #[error("missing input: {field} must not be empty")]
    MissingInput { field: &'static str },

    /// Transport failure, non-2xx status or a response that could not be understood.
    #[error("distance provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered but its top-level status was not `OK`.
    #[error("distance provider rejected the request with status {status}")]
    ProviderRejected { status: String },

    /// The provider found no route between the two addresses.
    #[error("no route found between origin and destination (status {status})")]
    NoRouteFound { status: String },
}

/// Fails with [`DistanceError::MissingInput`] naming the first empty input.
///
/// # Errors
///
/// Returns [`DistanceError::MissingInput`] if any argument is empty or
/// whitespace-only.
pub fn require_inputs(origin: &str, destination: &str, api_key: &str) -> Result<(), DistanceError> {
    for (field, value) in [
        ("origin", origin),
        ("destination", destination),
        ("api_key", api_key),
    ] {
        if value.trim().is_empty() {
            return Err(DistanceError::MissingInput { field });
        }
    }
    Ok(())
}
