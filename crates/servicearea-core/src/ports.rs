//! Traits at the storage and network seams.
//!
//! Implementations live in adapter crates (`servicearea-db`,
//! `servicearea-distance`) and in [`crate::memory`]. Signatures carry only
//! domain types so the resolver never sees `sqlx` or `reqwest`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::distance::{DistanceError, DistanceResult};
use crate::ranges::{NewPricingRange, PricingRange, RangeError};
use crate::settings::{Settings, SettingsChange, SettingsError, SettingsPatch};

/// Errors surfaced by range and settings stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The storage backend itself failed (connection, query, constraint).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Owner of the pricing ranges. The only writer of range records.
#[async_trait]
pub trait RangeRepository: Send + Sync {
    /// All ranges, ascending by `min_distance`, ties in insertion order.
    async fn list(&self) -> Result<Vec<PricingRange>, StoreError>;

    /// Validates and stores a new range, returning its id.
    ///
    /// The overlap check and the write happen atomically. On failure the
    /// store is unchanged.
    async fn insert(&self, range: NewPricingRange) -> Result<i64, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// First range (in listing order) whose closed interval contains `distance`.
    async fn find_covering(&self, distance: Decimal) -> Result<Option<PricingRange>, StoreError>;

    /// Liveness check backing `/api/v1/health`.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Persistence for [`Settings`].
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Stored settings, or [`Settings::default`] when none are stored.
    async fn get_settings(&self) -> Result<Settings, StoreError>;

    /// Validates and stores `settings`. Returns `true` if the stored value changed.
    async fn update_settings(&self, settings: &Settings) -> Result<bool, StoreError>;

    /// Applies `patch` to the stored settings as one atomic read-merge-write,
    /// so concurrent patches touching different fields do not lose each other.
    async fn patch_settings(&self, patch: &SettingsPatch) -> Result<SettingsChange, StoreError>;
}

/// External distance lookup between two free-text addresses.
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn compute(
        &self,
        origin: &str,
        destination: &str,
        api_key: &str,
    ) -> Result<DistanceResult, DistanceError>;
}
