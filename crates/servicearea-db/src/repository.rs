//! Postgres-backed implementations of the core storage traits.

use async_trait::async_trait;
use rust_decimal::Decimal;
use servicearea_core::{
    NewPricingRange, PricingRange, RangeRepository, Settings, SettingsChange, SettingsPatch,
    SettingsRepository, StoreError,
};
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct PgRangeStore {
    pool: PgPool,
}

impl PgRangeStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RangeRepository for PgRangeStore {
    async fn list(&self) -> Result<Vec<PricingRange>, StoreError> {
        let rows = crate::list_pricing_ranges(&self.pool).await?;
        Ok(rows.into_iter().map(PricingRange::from).collect())
    }

    async fn insert(&self, range: NewPricingRange) -> Result<i64, StoreError> {
        let row = crate::insert_pricing_range(&self.pool, &range).await?;
        Ok(row.id)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        Ok(crate::delete_pricing_range(&self.pool, id).await?)
    }

    async fn find_covering(&self, distance: Decimal) -> Result<Option<PricingRange>, StoreError> {
        let row = crate::find_covering_range(&self.pool, distance).await?;
        Ok(row.map(PricingRange::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::ping(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsStore {
    async fn get_settings(&self) -> Result<Settings, StoreError> {
        Ok(crate::get_settings(&self.pool).await?)
    }

    async fn update_settings(&self, settings: &Settings) -> Result<bool, StoreError> {
        Ok(crate::update_settings(&self.pool, settings).await?)
    }

    async fn patch_settings(&self, patch: &SettingsPatch) -> Result<SettingsChange, StoreError> {
        Ok(crate::patch_settings(&self.pool, patch).await?)
    }
}
