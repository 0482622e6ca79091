//! Pricing range administration: list, create, delete.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use servicearea_core::{NewPricingRange, PricingRange};

use crate::middleware::RequestId;

use super::{map_store_error, rejected_input, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RangeItem {
    pub id: i64,
    pub min_distance: Decimal,
    pub max_distance: Decimal,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<PricingRange> for RangeItem {
    fn from(range: PricingRange) -> Self {
        Self {
            id: range.id,
            min_distance: range.min_distance,
            max_distance: range.max_distance,
            price: range.price,
            created_at: range.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateRangeRequest {
    pub min_distance: Decimal,
    pub max_distance: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRangeResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteRangeResponse {
    pub id: i64,
    pub deleted: bool,
}

/// GET /api/v1/ranges
pub(super) async fn list_ranges(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<RangeItem>>>, ApiError> {
    let ranges = state
        .ranges
        .list()
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: ranges.into_iter().map(RangeItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/ranges
pub(super) async fn create_range(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CreateRangeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreateRangeResponse>>), ApiError> {
    let Json(body) = body.map_err(|e| rejected_input(&req_id.0, &e.body_text()))?;
    let range = NewPricingRange::new(body.min_distance, body.max_distance, body.price);
    let id = state
        .ranges
        .insert(range)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CreateRangeResponse { id },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// DELETE /api/v1/ranges/{id}
pub(super) async fn delete_range(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<DeleteRangeResponse>>, ApiError> {
    let Path(id) = id.map_err(|e| rejected_input(&req_id.0, &e.body_text()))?;
    state
        .ranges
        .delete(id)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: DeleteRangeResponse { id, deleted: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}
