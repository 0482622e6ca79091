//! Distance-to-price resolution.
//!
//! [`PricingResolver`] is the single entry point used by presentation code.
//! It holds no state of its own beyond its collaborators.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::distance::{require_inputs, DistanceError};
use crate::ports::{DistanceProvider, RangeRepository, SettingsRepository, StoreError};

/// Price resolved for an address pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// `None` when no range covers the distance.
    pub price: Option<Decimal>,
    pub distance_km: Decimal,
    pub duration: String,
}

/// Result of checking a customer address against the store's service area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCheck {
    pub origin: String,
    pub max_service_radius: Decimal,
    pub within_service_area: bool,
    pub quote: Quote,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The distance lookup failed; carried unchanged from the provider.
    #[error(transparent)]
    Distance(#[from] DistanceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct PricingResolver {
    ranges: Arc<dyn RangeRepository>,
    distance: Arc<dyn DistanceProvider>,
    settings: Arc<dyn SettingsRepository>,
}

impl PricingResolver {
    #[must_use]
    pub fn new(
        ranges: Arc<dyn RangeRepository>,
        distance: Arc<dyn DistanceProvider>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            ranges,
            distance,
            settings,
        }
    }

    /// Price of the range covering `distance_km`, or `None` when the distance
    /// is outside every configured range.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the range store cannot be read.
    pub async fn price_for_distance(
        &self,
        distance_km: Decimal,
    ) -> Result<Option<Decimal>, StoreError> {
        let covering = self.ranges.find_covering(distance_km).await?;
        if covering.is_none() {
            tracing::debug!(%distance_km, "no pricing range covers distance");
        }
        Ok(covering.map(|r| r.price))
    }

    /// Looks up the driving distance between two addresses and prices it.
    ///
    /// Empty inputs fail before the provider is called. Provider failures
    /// are returned as-is and the range store is not consulted.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Distance`] for any [`DistanceError`].
    /// - [`ResolveError::Store`] if the range store cannot be read.
    pub async fn price_for_addresses(
        &self,
        origin: &str,
        destination: &str,
        api_key: &str,
    ) -> Result<Quote, ResolveError> {
        require_inputs(origin, destination, api_key)?;

        let result = self
            .distance
            .compute(origin, destination, api_key)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "distance lookup failed"))?;

        let price = self.price_for_distance(result.distance_km).await?;

        Ok(Quote {
            price,
            distance_km: result.distance_km,
            duration: result.duration_text,
        })
    }

    /// Prices a trip from the configured store address to `destination` and
    /// reports whether it falls inside the configured service radius.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Store`] if settings or ranges cannot be read.
    /// - [`ResolveError::Distance`] if the store address, provider key or
    ///   destination is missing, or the provider lookup fails.
    pub async fn check_service_area(&self, destination: &str) -> Result<ServiceCheck, ResolveError> {
        let settings = self.settings.get_settings().await?;

        let quote = self
            .price_for_addresses(&settings.store_address, destination, &settings.api_key)
            .await?;
        let within_service_area = settings.within_service_area(quote.distance_km);

        tracing::info!(
            distance_km = %quote.distance_km,
            within_service_area,
            priced = quote.price.is_some(),
            "service area check"
        );

        Ok(ServiceCheck {
            origin: settings.store_address,
            max_service_radius: settings.max_service_radius,
            within_service_area,
            quote,
        })
    }
}
