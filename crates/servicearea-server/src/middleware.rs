//! Request correlation and the quota guard for provider-backed routes.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Caller-supplied ids longer than this are replaced with a fresh one.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation id for one request, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug)]
struct QuotaWindow {
    opened_at: Instant,
    admitted: usize,
}

/// Fixed-window budget for `/price` and `/service-check`.
///
/// Every admitted request may spend one distance-provider call, so this caps
/// provider usage per window across all clients. Admin routes are not counted.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    budget: usize,
    window: Duration,
    current: Arc<Mutex<QuotaWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(budget: usize, window: Duration) -> Self {
        Self {
            budget,
            window,
            current: Arc::new(Mutex::new(QuotaWindow {
                opened_at: Instant::now(),
                admitted: 0,
            })),
        }
    }

    /// Budget of `requests` per minute, as configured by
    /// `SERVICEAREA_RATE_LIMIT_PER_MINUTE`.
    #[must_use]
    pub fn per_minute(requests: usize) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }

    /// Counts one request against the current window.
    ///
    /// Returns the time until the window reopens when the budget is spent.
    async fn admit(&self) -> Result<(), Duration> {
        let mut current = self.current.lock().await;
        let elapsed = current.opened_at.elapsed();
        if elapsed >= self.window {
            current.opened_at = Instant::now();
            current.admitted = 0;
        } else if current.admitted >= self.budget {
            return Err(self.window - elapsed);
        }
        current.admitted += 1;
        Ok(())
    }
}

fn usable_request_id(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?.trim();
    (!id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN).then(|| id.to_owned())
}

/// Tags the request with a [`RequestId`] and echoes it as `x-request-id`.
///
/// A usable incoming `x-request-id` is kept so callers can correlate their
/// logs with ours; anything else gets a fresh `UUIDv4`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(usable_request_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

/// Rejects metered requests with `rate_limited` once the window's budget is
/// spent. The 429 carries `Retry-After` in whole seconds.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let Err(wait) = rate_limit.admit().await else {
        return next.run(req).await;
    };

    let req_id = req
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();
    let retry_after = wait.as_secs().max(1);
    tracing::warn!(
        request_id = %req_id,
        path = %req.uri().path(),
        retry_after,
        "provider quota window exhausted"
    );

    let mut res = ApiError::new(
        req_id,
        "rate_limited",
        format!("too many pricing requests; retry in {retry_after}s"),
    )
    .into_response();
    res.headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    res
}
