//! Integration tests for `BarkClient` using wiremock HTTP mocks.

use pickupwatch_notify::{BarkClient, NotifyError, NotifyOutcome};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str, device_key: Option<&str>) -> BarkClient {
    BarkClient::with_endpoint(base_url, device_key, "pickupwatch", "minuet", None)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn push_posts_payload_to_device_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/device-key-1"))
        .and(body_partial_json(serde_json::json!({
            "title": "In stock: 홍대",
            "group": "pickupwatch",
            "sound": "minuet"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "code": 200 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("device-key-1"));
    let outcome = client
        .push("In stock: 홍대", "pickup available")
        .await
        .expect("push should succeed");

    assert_eq!(outcome, NotifyOutcome::Sent);
}

#[tokio::test]
async fn push_without_device_key_is_skipped() {
    let server = MockServer::start().await;

    // No mock mounted: any request would 404 and fail the test below.
    let client = test_client(&server.uri(), None);
    assert!(!client.is_configured());

    let outcome = client.push("title", "body").await.unwrap();
    assert_eq!(outcome, NotifyOutcome::Skipped);
}

#[tokio::test]
async fn non_2xx_response_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("k"));
    let err = client.push("title", "body").await.unwrap_err();

    assert!(
        matches!(err, NotifyError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus, got: {err:?}"
    );
}

#[tokio::test]
async fn non_ok_application_code_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "code": 400, "message": "device key not found" }),
        ))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("k"));
    let err = client.push("title", "body").await.unwrap_err();

    assert!(
        matches!(err, NotifyError::Rejected { code: 400 }),
        "expected Rejected(400), got: {err:?}"
    );
}

#[tokio::test]
async fn plain_text_success_body_counts_as_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("k"));
    let outcome = client.push("title", "body").await.unwrap();

    assert_eq!(outcome, NotifyOutcome::Sent);
}
