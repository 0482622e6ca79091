//! Price resolution endpoints. Both call the distance provider and sit
//! behind the rate limiter.

use std::str::FromStr;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use servicearea_core::{Quote, ServiceCheck};

use crate::middleware::RequestId;

use super::{
    map_resolve_error, map_store_error, rejected_input, ApiError, ApiResponse, AppState,
    ResponseMeta,
};

#[derive(Debug, Deserialize)]
pub(super) struct PriceQuery {
    pub distance: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PriceData {
    pub distance_km: Decimal,
    /// Travel time as reported by the provider; absent for raw distances.
    pub duration: Option<String>,
    /// `None` when no range covers the distance.
    pub price: Option<Decimal>,
}

impl From<Quote> for PriceData {
    fn from(quote: Quote) -> Self {
        Self {
            distance_km: quote.distance_km,
            duration: Some(quote.duration),
            price: quote.price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ServiceCheckQuery {
    pub destination: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ServiceCheckData {
    pub origin: String,
    pub destination: String,
    pub distance_km: Decimal,
    pub duration: String,
    pub price: Option<Decimal>,
    pub max_service_radius: Decimal,
    pub within_service_area: bool,
}

impl ServiceCheckData {
    fn new(destination: String, check: ServiceCheck) -> Self {
        Self {
            origin: check.origin,
            destination,
            distance_km: check.quote.distance_km,
            duration: check.quote.duration,
            price: check.quote.price,
            max_service_radius: check.max_service_radius,
            within_service_area: check.within_service_area,
        }
    }
}

/// GET /api/v1/price?distance=..  or  ?origin=..&destination=..
///
/// The provider key is read from the stored settings.
pub(super) async fn get_price(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<PriceData>>, ApiError> {
    let rid = &req_id.0;
    let Query(query) = query.map_err(|e| rejected_input(rid, &e.body_text()))?;

    let data = if let Some(raw) = query.distance.as_deref() {
        if query.origin.is_some() || query.destination.is_some() {
            return Err(ApiError::new(
                rid,
                "validation_error",
                "provide either distance or origin and destination, not both",
            ));
        }
        let distance_km = Decimal::from_str(raw.trim()).map_err(|_| {
            ApiError::new(
                rid,
                "validation_error",
                format!("distance must be a decimal number, got '{raw}'"),
            )
        })?;
        let price = state
            .resolver
            .price_for_distance(distance_km)
            .await
            .map_err(|e| map_store_error(rid, &e))?;
        PriceData {
            distance_km,
            duration: None,
            price,
        }
    } else {
        let settings = state
            .settings
            .get_settings()
            .await
            .map_err(|e| map_store_error(rid, &e))?;
        let quote = state
            .resolver
            .price_for_addresses(
                query.origin.as_deref().unwrap_or_default(),
                query.destination.as_deref().unwrap_or_default(),
                &settings.api_key,
            )
            .await
            .map_err(|e| map_resolve_error(rid, &e))?;
        PriceData::from(quote)
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/service-check?destination=..
pub(super) async fn check_service_area(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ServiceCheckQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ServiceCheckData>>, ApiError> {
    let Query(query) = query.map_err(|e| rejected_input(&req_id.0, &e.body_text()))?;
    let destination = query.destination.unwrap_or_default();
    let check = state
        .resolver
        .check_service_area(&destination)
        .await
        .map_err(|e| map_resolve_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: ServiceCheckData::new(destination.trim().to_owned(), check),
        meta: ResponseMeta::new(req_id.0),
    }))
}
