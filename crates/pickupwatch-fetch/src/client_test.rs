use super::*;

#[test]
fn pickup_url_encodes_all_query_parameters() {
    let client = PickupClient::with_base_url(
        "https://www.apple.com/kr",
        "MFYQ4KH/A",
        "R764",
        true,
        20,
        "test-agent",
    )
    .unwrap();

    assert_eq!(
        client.endpoint(),
        "https://www.apple.com/kr/shop/retail/pickup-message?pl=true&searchNearby=true&store=R764&parts.0=MFYQ4KH%2FA"
    );
}

#[test]
fn pickup_url_without_nearby_expansion() {
    let client = PickupClient::with_base_url(
        "https://www.apple.com/kr",
        "MFYQ4KH/A",
        "R764",
        false,
        20,
        "test-agent",
    )
    .unwrap();

    assert!(client.endpoint().contains("searchNearby=false"));
}

#[test]
fn pickup_url_strips_trailing_slash() {
    let client = PickupClient::with_base_url(
        "https://www.apple.com/kr/",
        "MFYQ4KH/A",
        "R764",
        true,
        20,
        "test-agent",
    )
    .unwrap();

    assert!(client
        .endpoint()
        .starts_with("https://www.apple.com/kr/shop/retail/pickup-message?"));
}

#[test]
fn rejects_invalid_base_url() {
    let result = PickupClient::with_base_url("not-a-url", "MFYQ4KH/A", "R764", true, 20, "ua");
    assert!(
        matches!(result, Err(FetchError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}
