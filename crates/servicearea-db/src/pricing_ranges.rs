//! Database operations for the `pricing_ranges` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use servicearea_core::{NewPricingRange, PricingRange, RangeError};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `pricing_ranges` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PricingRangeRow {
    pub id: i64,
    pub min_distance: Decimal,
    pub max_distance: Decimal,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<PricingRangeRow> for PricingRange {
    fn from(row: PricingRangeRow) -> Self {
        Self {
            id: row.id,
            min_distance: row.min_distance,
            max_distance: row.max_distance,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

/// List all pricing ranges, ascending by `min_distance`; ties in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure.
pub async fn list_pricing_ranges(pool: &PgPool) -> Result<Vec<PricingRangeRow>, DbError> {
    Ok(sqlx::query_as::<_, PricingRangeRow>(
        "SELECT id, min_distance, max_distance, price, created_at \
         FROM pricing_ranges \
         ORDER BY min_distance ASC, id ASC",
    )
    .fetch_all(pool)
    .await?)
}

/// Validate and insert a pricing range. Returns the full inserted row.
///
/// The overlap check and the insert run in one transaction holding a
/// `SHARE ROW EXCLUSIVE` table lock. That lock mode conflicts with itself,
/// so concurrent inserts are serialized and cannot both pass the check.
///
/// # Errors
///
/// - [`DbError::Range`] with [`RangeError::InvalidRange`] for bad bounds.
/// - [`DbError::Range`] with [`RangeError::Overlap`] naming the first
///   conflicting range in listing order. Nothing is written.
/// - [`DbError::Sqlx`] on query failure.
pub async fn insert_pricing_range(
    pool: &PgPool,
    range: &NewPricingRange,
) -> Result<PricingRangeRow, DbError> {
    range.validate()?;

    let mut tx = pool.begin().await?;

    sqlx::query("LOCK TABLE pricing_ranges IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    let conflicting_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM pricing_ranges \
         WHERE $1 <= max_distance AND $2 >= min_distance \
         ORDER BY min_distance ASC, id ASC \
         LIMIT 1",
    )
    .bind(range.min_distance)
    .bind(range.max_distance)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(conflicting_id) = conflicting_id {
        tx.rollback().await?;
        return Err(RangeError::Overlap { conflicting_id }.into());
    }

    let row = sqlx::query_as::<_, PricingRangeRow>(
        "INSERT INTO pricing_ranges (min_distance, max_distance, price) \
         VALUES ($1, $2, $3) \
         RETURNING id, min_distance, max_distance, price, created_at",
    )
    .bind(range.min_distance)
    .bind(range.max_distance)
    .bind(range.price)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        id = row.id,
        min_distance = %row.min_distance,
        max_distance = %row.max_distance,
        price = %row.price,
        "pricing range created"
    );

    Ok(row)
}

/// Delete a pricing range by id.
///
/// # Errors
///
/// Returns [`DbError::Range`] with [`RangeError::NotFound`] if no row has
/// that id, or [`DbError::Sqlx`] on query failure.
pub async fn delete_pricing_range(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM pricing_ranges WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RangeError::NotFound { id }.into());
    }

    tracing::info!(id, "pricing range deleted");
    Ok(())
}

/// First range in listing order whose closed interval contains `distance`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure.
pub async fn find_covering_range(
    pool: &PgPool,
    distance: Decimal,
) -> Result<Option<PricingRangeRow>, DbError> {
    Ok(sqlx::query_as::<_, PricingRangeRow>(
        "SELECT id, min_distance, max_distance, price, created_at \
         FROM pricing_ranges \
         WHERE min_distance <= $1 AND max_distance >= $1 \
         ORDER BY min_distance ASC, id ASC \
         LIMIT 1",
    )
    .bind(distance)
    .fetch_optional(pool)
    .await?)
}
