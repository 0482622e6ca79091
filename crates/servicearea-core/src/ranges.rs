//! Pricing ranges: closed distance intervals (km) mapped to a flat price.
//!
//! Both bounds are inclusive. Two ranges that share only a boundary point
//! (e.g. `[0, 10]` and `[10, 20]`) overlap and cannot coexist in one store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored pricing band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRange {
    /// Store-assigned identifier, never reused after deletion.
    pub id: i64,
    pub min_distance: Decimal,
    pub max_distance: Decimal,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl PricingRange {
    /// Returns `true` if `distance` lies within `[min_distance, max_distance]`.
    #[must_use]
    pub fn covers(&self, distance: Decimal) -> bool {
        self.min_distance <= distance && distance <= self.max_distance
    }

    /// Returns `true` if this range shares at least one point with `[min, max]`.
    #[must_use]
    pub fn overlaps(&self, min: Decimal, max: Decimal) -> bool {
        min <= self.max_distance && max >= self.min_distance
    }
}

/// Bounds and price submitted for a new range, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPricingRange {
    pub min_distance: Decimal,
    pub max_distance: Decimal,
    pub price: Decimal,
}

impl NewPricingRange {
    #[must_use]
    pub fn new(min_distance: Decimal, max_distance: Decimal, price: Decimal) -> Self {
        Self {
            min_distance,
            max_distance,
            price,
        }
    }

    /// Checks the bounds and price in isolation from any stored range.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidRange`] if a bound or the price is
    /// negative, or if `min_distance > max_distance`.
    pub fn validate(&self) -> Result<(), RangeError> {
        if self.min_distance < Decimal::ZERO {
            return Err(RangeError::InvalidRange {
                reason: format!("min_distance must be non-negative, got {}", self.min_distance),
            });
        }
        if self.max_distance < Decimal::ZERO {
            return Err(RangeError::InvalidRange {
                reason: format!("max_distance must be non-negative, got {}", self.max_distance),
            });
        }
        if self.min_distance > self.max_distance {
            return Err(RangeError::InvalidRange {
                reason: format!(
                    "min_distance ({}) must not exceed max_distance ({})",
                    self.min_distance, self.max_distance
                ),
            });
        }
        if self.price < Decimal::ZERO {
            return Err(RangeError::InvalidRange {
                reason: format!("price must be non-negative, got {}", self.price),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("range overlaps existing range {conflicting_id}")]
    Overlap { conflicting_id: i64 },

    #[error("pricing range {id} not found")]
    NotFound { id: i64 },
}

/// Returns the first range in `ranges` (in iteration order) that overlaps
/// `candidate`, if any.
#[must_use]
pub fn find_overlap<'a, I>(ranges: I, candidate: &NewPricingRange) -> Option<&'a PricingRange>
where
    I: IntoIterator<Item = &'a PricingRange>,
{
    ranges
        .into_iter()
        .find(|r| r.overlaps(candidate.min_distance, candidate.max_distance))
}

/// Linear scan returning the first range covering `distance`.
///
/// `ranges` is expected in ascending `min_distance` order. With overlap
/// rejected at insert time at most one range can match, so the order only
/// makes the result deterministic.
#[must_use]
pub fn find_covering(ranges: &[PricingRange], distance: Decimal) -> Option<&PricingRange> {
    ranges.iter().find(|r| r.covers(distance))
}

/// Stable sort by `min_distance`; ties keep their existing (insertion) order.
pub fn sort_for_listing(ranges: &mut [PricingRange]) {
    ranges.sort_by(|a, b| a.min_distance.cmp(&b.min_distance));
}
