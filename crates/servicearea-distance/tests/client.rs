//! Integration tests for `DistanceMatrixClient` using wiremock HTTP mocks.

use rust_decimal::Decimal;
use servicearea_core::{DistanceError, DistanceProvider};
use servicearea_distance::DistanceMatrixClient;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> DistanceMatrixClient {
    DistanceMatrixClient::with_base_url(base_url, 5).expect("client construction should not fail")
}

fn ok_body(meters: i64, duration: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "OK",
        "origin_addresses": ["Store"],
        "destination_addresses": ["Customer"],
        "rows": [{ "elements": [{
            "status": "OK",
            "distance": { "value": meters, "text": "ignored" },
            "duration": { "value": 60, "text": duration }
        }]}]
    })
}

#[tokio::test]
async fn compute_returns_distance_in_km() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("origins", "1 Main St"))
        .and(query_param("destinations", "99 High St"))
        .and(query_param("units", "metric"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(12_345, "18 mins")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .compute("1 Main St", "99 High St", "test-key")
        .await
        .expect("lookup should succeed");

    assert_eq!(result.distance_km, Decimal::new(12_345, 3));
    assert_eq!(result.duration_text, "18 mins");
}

#[tokio::test]
async fn empty_inputs_never_reach_the_provider() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(1000, "1 min")))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    for (origin, destination, key, field) in [
        ("", "b", "k", "origin"),
        ("a", "   ", "k", "destination"),
        ("a", "b", "", "api_key"),
    ] {
        let err = client.compute(origin, destination, key).await.unwrap_err();
        assert_eq!(err, DistanceError::MissingInput { field });
    }
}

#[tokio::test]
async fn element_not_found_is_no_route() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "rows": [{ "elements": [{ "status": "NOT_FOUND" }] }]
    });
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.compute("a", "nowhere", "k").await.unwrap_err();
    assert_eq!(
        err,
        DistanceError::NoRouteFound {
            status: "NOT_FOUND".to_owned()
        }
    );
}

#[tokio::test]
async fn top_level_error_status_is_rejected() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "REQUEST_DENIED",
        "error_message": "The provided API key is invalid.",
        "rows": []
    });
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.compute("a", "b", "bad-key").await.unwrap_err();
    assert_eq!(
        err,
        DistanceError::ProviderRejected {
            status: "REQUEST_DENIED".to_owned()
        }
    );
}

#[tokio::test]
async fn malformed_body_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.compute("a", "b", "k").await.unwrap_err();
    assert!(matches!(err, DistanceError::ProviderUnavailable(_)));
}

#[tokio::test]
async fn server_error_is_unavailable_and_hides_the_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.compute("a", "b", "secret-key").await.unwrap_err();
    match err {
        DistanceError::ProviderUnavailable(reason) => {
            assert!(reason.contains("503"), "reason: {reason}");
            assert!(!reason.contains("secret-key"), "reason leaks key: {reason}");
        }
        other => panic!("expected ProviderUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_provider_is_unavailable() {
    // Port 1 on localhost is not listening in test environments.
    let client = test_client("http://127.0.0.1:1/json");
    let err = client.compute("a", "b", "secret-key").await.unwrap_err();
    match err {
        DistanceError::ProviderUnavailable(reason) => {
            assert!(!reason.contains("secret-key"), "reason leaks key: {reason}");
        }
        other => panic!("expected ProviderUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn retry_recovers_from_transient_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(2_500, "4 mins")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let result = client.compute("a", "b", "k").await.expect("retry should succeed");
    assert_eq!(result.distance_km, Decimal::new(25, 1));
}

#[tokio::test]
async fn rejected_status_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "OVER_QUERY_LIMIT" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(3, 0);
    let err = client.compute("a", "b", "k").await.unwrap_err();
    assert!(matches!(err, DistanceError::ProviderRejected { .. }));
}
