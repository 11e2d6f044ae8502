//! Integration tests for the outbound rate service call.
//!
//! `ReqwestPoster` talks to an `httpmock` server over real HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use httpmock::prelude::*;
use live_rates_integration_tests::{RATES_PATH, TWO_BY_TWO};
use live_rates_server::rates::{RateClient, ReqwestPoster, ShippingError};
use rust_decimal::Decimal;

const BODY: &str = r#"{"packages":[{"id":1}]}"#;
const SIGNATURE: &str = "sha256=dGVzdA==";

fn client() -> RateClient<ReqwestPoster> {
    RateClient::new(ReqwestPoster::new().unwrap())
}

// =============================================================================
// Request Shape
// =============================================================================

#[tokio::test]
async fn test_posts_exact_body_with_signature_header() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(RATES_PATH)
            .header("content-type", "application/json")
            .header("x-ps-lsr-signature", SIGNATURE)
            .body(BODY);
        then.status(200).body(TWO_BY_TWO);
    });

    let rates = client()
        .fetch_rates(&server.url(RATES_PATH), BODY.as_bytes().to_vec(), SIGNATURE)
        .await
        .unwrap();

    mock.assert_hits(1);
    assert_eq!(rates.len(), 4);
}

#[tokio::test]
async fn test_rates_flattened_in_response_order() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(RATES_PATH);
        then.status(200).body(TWO_BY_TWO);
    });

    let rates = client()
        .fetch_rates(&server.url(RATES_PATH), BODY.as_bytes().to_vec(), SIGNATURE)
        .await
        .unwrap();

    let ids: Vec<_> = rates.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        ["AUSPOST_REG", "AUSPOST_EXP", "COURIER_STD", "COURIER_PRI"]
    );
    assert_eq!(rates[1].label, "Express");
    assert_eq!(rates[1].cost, Decimal::new(1495, 2));
    assert_eq!(rates[1].taxes["1"], serde_json::json!("1.36"));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_server_error_is_remote_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(RATES_PATH);
        then.status(500).body("upstream exploded");
    });

    let err = client()
        .fetch_rates(&server.url(RATES_PATH), BODY.as_bytes().to_vec(), SIGNATURE)
        .await
        .unwrap_err();

    assert!(matches!(err, ShippingError::Remote(500)));
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = MockServer::start();
    let target = server.mock(|when, then| {
        when.path("/moved");
        then.status(200).body(TWO_BY_TWO);
    });
    let _mock = server.mock(|when, then| {
        when.method(POST).path(RATES_PATH);
        then.status(302).header("location", server.url("/moved"));
    });

    let err = client()
        .fetch_rates(&server.url(RATES_PATH), BODY.as_bytes().to_vec(), SIGNATURE)
        .await
        .unwrap_err();

    assert!(matches!(err, ShippingError::Remote(302)));
    target.assert_hits(0);
}

#[tokio::test]
async fn test_empty_body_is_parse_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(RATES_PATH);
        then.status(200);
    });

    let err = client()
        .fetch_rates(&server.url(RATES_PATH), BODY.as_bytes().to_vec(), SIGNATURE)
        .await
        .unwrap_err();

    assert!(matches!(err, ShippingError::Parse(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on the discard port
    let err = client()
        .fetch_rates("http://127.0.0.1:9/rates", BODY.as_bytes().to_vec(), SIGNATURE)
        .await
        .unwrap_err();

    assert!(matches!(err, ShippingError::Transport(_)));
}

#[tokio::test]
async fn test_slow_service_times_out_as_transport_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(RATES_PATH);
        then.status(200)
            .body(TWO_BY_TWO)
            .delay(Duration::from_millis(1500));
    });

    let client = RateClient::new(ReqwestPoster::with_timeout(Duration::from_millis(100)).unwrap());
    let err = client
        .fetch_rates(&server.url(RATES_PATH), BODY.as_bytes().to_vec(), SIGNATURE)
        .await
        .unwrap_err();

    assert!(matches!(err, ShippingError::Transport(ref msg) if msg.starts_with("request timed out")));
}

// =============================================================================
// Lenient Amounts
// =============================================================================

#[tokio::test]
async fn test_null_tax_on_one_rate_keeps_the_others() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(RATES_PATH);
        then.status(200).body(
            r#"{"packages_rates": [{"rates": [
                {"code": "AUSPOST_REG", "name": "Regular", "total_cost": "9.95", "calculated_taxes": "0.90"},
                {"code": "AUSPOST_EXP", "name": "Express", "total_cost": "14.95", "calculated_taxes": null}
            ]}]}"#,
        );
    });

    let rates = client()
        .fetch_rates(&server.url(RATES_PATH), BODY.as_bytes().to_vec(), SIGNATURE)
        .await
        .unwrap();

    assert_eq!(rates.len(), 2);
    assert_eq!(rates[0].cost, Decimal::new(995, 2));
    assert!(rates[1].taxes["1"].is_null());
}
