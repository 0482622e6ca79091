//! In-process stores for embedding the resolver without a database.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::ports::{RangeRepository, SettingsRepository, StoreError};
use crate::ranges::{
    find_covering, find_overlap, sort_for_listing, NewPricingRange, PricingRange, RangeError,
};
use crate::settings::{Settings, SettingsChange, SettingsPatch};

#[derive(Debug)]
struct RangeTable {
    next_id: i64,
    /// Kept in listing order.
    ranges: Vec<PricingRange>,
}

/// Range store backed by a `Vec` behind a mutex.
///
/// The lock is held across validation and insert, so concurrent inserts
/// cannot both pass the overlap check.
#[derive(Debug)]
pub struct MemoryRangeStore {
    table: Mutex<RangeTable>,
}

impl Default for MemoryRangeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRangeStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Mutex::new(RangeTable {
                next_id: 1,
                ranges: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RangeTable>, StoreError> {
        self.table
            .lock()
            .map_err(|_| StoreError::Backend("range table lock poisoned".to_owned()))
    }
}

#[async_trait]
impl RangeRepository for MemoryRangeStore {
    async fn list(&self) -> Result<Vec<PricingRange>, StoreError> {
        Ok(self.lock()?.ranges.clone())
    }

    async fn insert(&self, range: NewPricingRange) -> Result<i64, StoreError> {
        range.validate()?;

        let mut table = self.lock()?;
        if let Some(existing) = find_overlap(&table.ranges, &range) {
            return Err(RangeError::Overlap {
                conflicting_id: existing.id,
            }
            .into());
        }

        let id = table.next_id;
        table.next_id += 1;
        table.ranges.push(PricingRange {
            id,
            min_distance: range.min_distance,
            max_distance: range.max_distance,
            price: range.price,
            created_at: Utc::now(),
        });
        sort_for_listing(&mut table.ranges);
        drop(table);

        tracing::debug!(id, "pricing range stored");
        Ok(id)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut table = self.lock()?;
        let position = table
            .ranges
            .iter()
            .position(|r| r.id == id)
            .ok_or(RangeError::NotFound { id })?;
        table.ranges.remove(position);
        Ok(())
    }

    async fn find_covering(&self, distance: Decimal) -> Result<Option<PricingRange>, StoreError> {
        let table = self.lock()?;
        Ok(find_covering(&table.ranges, distance).cloned())
    }
}

/// Settings store holding a single value in memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Option<Settings>>,
}

impl MemorySettingsStore {
    /// Store pre-populated with `settings`.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
        }
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsStore {
    async fn get_settings(&self) -> Result<Settings, StoreError> {
        let stored = self
            .settings
            .lock()
            .map_err(|_| StoreError::Backend("settings lock poisoned".to_owned()))?;
        Ok(stored.clone().unwrap_or_default())
    }

    async fn update_settings(&self, settings: &Settings) -> Result<bool, StoreError> {
        let settings = settings.normalized();
        settings.validate()?;

        let mut stored = self
            .settings
            .lock()
            .map_err(|_| StoreError::Backend("settings lock poisoned".to_owned()))?;
        if stored.as_ref() == Some(&settings) {
            return Ok(false);
        }
        *stored = Some(settings);
        Ok(true)
    }

    async fn patch_settings(&self, patch: &SettingsPatch) -> Result<SettingsChange, StoreError> {
        let mut stored = self
            .settings
            .lock()
            .map_err(|_| StoreError::Backend("settings lock poisoned".to_owned()))?;
        let current = stored.clone().unwrap_or_default();
        let next = patch.apply_to(&current);
        next.validate()?;

        let changed = stored.as_ref() != Some(&next);
        if changed {
            *stored = Some(next.clone());
        }
        Ok(SettingsChange {
            settings: next,
            changed,
        })
    }
}
