//! Business settings. The provider key is write-only over HTTP.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use servicearea_core::{Settings, SettingsPatch};

use crate::middleware::RequestId;

use super::{map_store_error, rejected_input, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SettingsView {
    pub store_address: String,
    pub max_service_radius: Decimal,
    pub api_key_configured: bool,
}

impl From<&Settings> for SettingsView {
    fn from(settings: &Settings) -> Self {
        Self {
            store_address: settings.store_address.clone(),
            max_service_radius: settings.max_service_radius,
            api_key_configured: settings.has_api_key(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateSettingsResponse {
    pub settings: SettingsView,
    pub changed: bool,
}

/// GET /api/v1/settings
pub(super) async fn get_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<SettingsView>>, ApiError> {
    let settings = state
        .settings
        .get_settings()
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: SettingsView::from(&settings),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/settings
///
/// Fields left out of the body keep their stored value. The merge happens
/// inside the store, so concurrent partial updates do not overwrite each other.
pub(super) async fn update_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SettingsPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<UpdateSettingsResponse>>, ApiError> {
    let rid = &req_id.0;
    let Json(patch) = body.map_err(|e| rejected_input(rid, &e.body_text()))?;

    let change = state
        .settings
        .patch_settings(&patch)
        .await
        .map_err(|e| map_store_error(rid, &e))?;

    Ok(Json(ApiResponse {
        data: UpdateSettingsResponse {
            settings: SettingsView::from(&change.settings),
            changed: change.changed,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
