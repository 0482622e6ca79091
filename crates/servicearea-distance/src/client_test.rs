use super::*;

fn test_client(base_url: &str) -> DistanceMatrixClient {
    DistanceMatrixClient::with_base_url(base_url, 30).expect("client construction should not fail")
}

#[test]
fn build_url_appends_matrix_parameters() {
    let client = test_client("https://maps.example.com/distancematrix/json");
    let url = client.build_url("Origin", "Dest", "test-key");
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/distancematrix/json?origins=Origin&destinations=Dest&units=metric&key=test-key"
    );
}

#[test]
fn build_url_encodes_addresses() {
    let client = test_client("https://maps.example.com/json");
    let url = client.build_url("1 Main St, Springfield", "Baker & Sons", "k");
    let query = url.query().unwrap_or_default();
    assert!(
        query.contains("origins=1+Main+St%2C+Springfield"),
        "origin should be percent-encoded: {url}"
    );
    assert!(
        query.contains("destinations=Baker+%26+Sons"),
        "destination should be percent-encoded: {url}"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = DistanceMatrixClient::with_base_url("not a url", 30).unwrap_err();
    assert!(matches!(err, ClientBuildError::InvalidBaseUrl { .. }));
}

#[test]
fn retries_are_off_by_default() {
    let client = test_client("https://maps.example.com/json");
    assert_eq!(client.max_retries, 0);

    let client = client.with_retry(2, 10);
    assert_eq!(client.max_retries, 2);
    assert_eq!(client.retry_backoff_ms, 10);
}
