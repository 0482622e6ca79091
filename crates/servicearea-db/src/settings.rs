//! Database operations for the single-row `service_settings` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use servicearea_core::{Settings, SettingsChange, SettingsPatch};
use sqlx::{PgExecutor, PgPool};

use crate::DbError;

/// The row from `service_settings`.
#[derive(Clone, sqlx::FromRow)]
pub struct SettingsRow {
    pub store_address: String,
    pub max_service_radius: Decimal,
    pub api_key: String,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for SettingsRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsRow")
            .field("store_address", &self.store_address)
            .field("max_service_radius", &self.max_service_radius)
            .field("api_key", &"[redacted]")
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Self {
            store_address: row.store_address,
            max_service_radius: row.max_service_radius,
            api_key: row.api_key,
        }
    }
}

/// Load the stored settings, falling back to [`Settings::default`] when the
/// row is missing.
///
/// # Errors
///
/// Returns [`DbError::Settings`] if the stored values fail validation, or
/// [`DbError::Sqlx`] on query failure.
pub async fn get_settings(pool: &PgPool) -> Result<Settings, DbError> {
    let row = sqlx::query_as::<_, SettingsRow>(
        "SELECT store_address, max_service_radius, api_key, updated_at \
         FROM service_settings WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    let settings = row.map(Settings::from).unwrap_or_default();
    settings.validate()?;
    Ok(settings)
}

/// Validate and store `settings`.
///
/// Returns `true` if the stored row changed, `false` if the submitted values
/// were identical to what was already stored.
///
/// # Errors
///
/// Returns [`DbError::Settings`] if validation fails, or [`DbError::Sqlx`]
/// on query failure.
pub async fn update_settings(pool: &PgPool, settings: &Settings) -> Result<bool, DbError> {
    let settings = settings.normalized();
    settings.validate()?;
    write_settings(pool, &settings).await
}

/// Apply `patch` to the stored row as one transaction.
///
/// The row is read with `FOR UPDATE`, so a concurrent patch waits and then
/// merges onto this one's result instead of overwriting it.
///
/// # Errors
///
/// Returns [`DbError::Settings`] if the merged settings fail validation
/// (nothing is written), or [`DbError::Sqlx`] on query failure.
pub async fn patch_settings(
    pool: &PgPool,
    patch: &SettingsPatch,
) -> Result<SettingsChange, DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO service_settings (id) VALUES (1) ON CONFLICT (id) DO NOTHING")
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query_as::<_, SettingsRow>(
        "SELECT store_address, max_service_radius, api_key, updated_at \
         FROM service_settings WHERE id = 1 FOR UPDATE",
    )
    .fetch_one(&mut *tx)
    .await?;

    let next = patch.apply_to(&Settings::from(row));
    next.validate()?;

    let changed = write_settings(&mut *tx, &next).await?;
    tx.commit().await?;

    Ok(SettingsChange {
        settings: next,
        changed,
    })
}

async fn write_settings<'e>(
    executor: impl PgExecutor<'e>,
    settings: &Settings,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO service_settings (id, store_address, max_service_radius, api_key) \
         VALUES (1, $1, $2, $3) \
         ON CONFLICT (id) DO UPDATE SET \
             store_address = EXCLUDED.store_address, \
             max_service_radius = EXCLUDED.max_service_radius, \
             api_key = EXCLUDED.api_key, \
             updated_at = NOW() \
         WHERE service_settings.store_address IS DISTINCT FROM EXCLUDED.store_address \
            OR service_settings.max_service_radius IS DISTINCT FROM EXCLUDED.max_service_radius \
            OR service_settings.api_key IS DISTINCT FROM EXCLUDED.api_key",
    )
    .bind(&settings.store_address)
    .bind(settings.max_service_radius)
    .bind(&settings.api_key)
    .execute(executor)
    .await?;

    let changed = result.rows_affected() > 0;
    if changed {
        tracing::info!(
            store_address = %settings.store_address,
            max_service_radius = %settings.max_service_radius,
            api_key_configured = settings.has_api_key(),
            "settings updated"
        );
    }
    Ok(changed)
}
