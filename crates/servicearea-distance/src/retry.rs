//! Bounded retry with exponential back-off and jitter for provider lookups.
//!
//! Only [`DistanceError::ProviderUnavailable`] is retried. A rejected request,
//! a missing route or a missing input would fail the same way again.

use std::future::Future;
use std::time::Duration;

use servicearea_core::DistanceError;

pub(crate) fn is_retriable(err: &DistanceError) -> bool {
    match err {
        DistanceError::ProviderUnavailable(_) => true,
        DistanceError::MissingInput { .. }
        | DistanceError::ProviderRejected { .. }
        | DistanceError::NoRouteFound { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The delay before retry `n` is `backoff_base_ms × 2ⁿ⁻¹` with ±25 % jitter,
/// capped at 30 s. With `max_retries = 0` the operation runs exactly once.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, DistanceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DistanceError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "distance provider unavailable, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn only_unavailable_is_retriable() {
        assert!(is_retriable(&DistanceError::ProviderUnavailable(
            "timeout".to_owned()
        )));
        assert!(!is_retriable(&DistanceError::ProviderRejected {
            status: "REQUEST_DENIED".to_owned()
        }));
        assert!(!is_retriable(&DistanceError::NoRouteFound {
            status: "NOT_FOUND".to_owned()
        }));
        assert!(!is_retriable(&DistanceError::MissingInput { field: "origin" }));
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(0, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(DistanceError::ProviderUnavailable("down".to_owned()))
            }
        })
        .await;
        assert!(matches!(result, Err(DistanceError::ProviderUnavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(DistanceError::ProviderUnavailable("reset".to_owned()))
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_no_route() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(DistanceError::NoRouteFound {
                    status: "NOT_FOUND".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "NoRouteFound must not be retried");
        assert!(matches!(result, Err(DistanceError::NoRouteFound { .. })));
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(DistanceError::ProviderUnavailable("down".to_owned()))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
