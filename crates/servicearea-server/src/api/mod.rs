mod price;
mod ranges;
mod settings;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use servicearea_core::{
    DistanceError, DistanceProvider, PricingResolver, RangeError, RangeRepository, ResolveError,
    SettingsError, SettingsRepository, StoreError,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER,
};

#[derive(Clone)]
pub struct AppState {
    pub ranges: Arc<dyn RangeRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub resolver: Arc<PricingResolver>,
}

impl AppState {
    pub fn new(
        ranges: Arc<dyn RangeRepository>,
        settings: Arc<dyn SettingsRepository>,
        distance: Arc<dyn DistanceProvider>,
    ) -> Self {
        let resolver = PricingResolver::new(Arc::clone(&ranges), distance, Arc::clone(&settings));
        Self {
            ranges,
            settings,
            resolver: Arc::new(resolver),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "no_route" => StatusCode::UNPROCESSABLE_ENTITY,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "provider_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: &str, error: &StoreError) -> ApiError {
    match error {
        StoreError::Range(RangeError::InvalidRange { .. })
        | StoreError::Settings(SettingsError::Invalid { .. }) => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        StoreError::Range(RangeError::Overlap { conflicting_id }) => {
            ApiError::new(request_id, "conflict", error.to_string())
                .with_details(serde_json::json!({ "conflicting_id": conflicting_id }))
        }
        StoreError::Range(RangeError::NotFound { .. }) => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        StoreError::Backend(_) => {
            tracing::error!(error = %error, "storage operation failed");
            ApiError::new(request_id, "internal_error", "storage operation failed")
        }
    }
}

/// Malformed path, query or body input that axum could not extract.
pub(super) fn rejected_input(request_id: &str, message: &str) -> ApiError {
    ApiError::new(request_id, "validation_error", message)
}

pub(super) fn map_resolve_error(request_id: &str, error: &ResolveError) -> ApiError {
    match error {
        ResolveError::Store(e) => map_store_error(request_id, e),
        ResolveError::Distance(e @ DistanceError::MissingInput { .. }) => {
            ApiError::new(request_id, "validation_error", e.to_string())
        }
        ResolveError::Distance(e @ DistanceError::NoRouteFound { .. }) => {
            ApiError::new(request_id, "no_route", e.to_string())
        }
        ResolveError::Distance(
            e @ (DistanceError::ProviderRejected { .. } | DistanceError::ProviderUnavailable(_)),
        ) => {
            tracing::warn!(error = %e, "distance provider failure");
            ApiError::new(request_id, "provider_error", e.to_string())
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, REQUEST_ID_HEADER])
}

/// Routes that call the distance provider and spend API quota.
fn metered_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/price", get(price::get_price))
        .route("/api/v1/service-check", get(price::check_service_area))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let admin_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/ranges",
            get(ranges::list_ranges).post(ranges::create_range),
        )
        .route("/api/v1/ranges/{id}", delete(ranges::delete_range))
        .route(
            "/api/v1/settings",
            get(settings::get_settings).put(settings::update_settings),
        );

    Router::new()
        .merge(admin_routes)
        .merge(metered_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.ranges.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
