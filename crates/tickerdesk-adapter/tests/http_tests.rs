/*
[INPUT]:  HTTP endpoint scenarios against a wiremock server
[OUTPUT]: Verification of request shapes, response parsing, and error mapping
[POS]:    Integration test layer - adapter HTTP surface
[UPDATE]: When adding endpoints or changing error mapping
*/

mod common;

use std::time::Duration;

use rstest::rstest;
use rust_decimal::Decimal;
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use tickerdesk_adapter::{ClientError, Credentials, TradingMode};

use common::{client_for, setup_mock_server};

#[tokio::test]
async fn account_status_parses_response() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/account/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "connected": true,
            "broker": "alpaca",
            "account_id": "PA123",
            "equity": "100000.50",
            "buying_power": "200000",
            "cash": "45000.25"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = assert_ok!(client.account_status(&CancellationToken::new()).await);

    assert!(status.connected);
    assert_eq!(status.broker, "alpaca");
    assert_eq!(status.equity, Decimal::new(10000050, 2));
}

#[tokio::test]
async fn credentials_attach_bearer_token() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/environment"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "mode": "paper",
            "data_provider": "polygon",
            "version": "1.4.2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_credentials(Credentials {
        api_token: "test-token".to_string(),
    });

    let info = assert_ok!(client.environment(&CancellationToken::new()).await);
    assert_eq!(info.mode, TradingMode::Paper);
    assert_eq!(info.data_provider, "polygon");
}

#[tokio::test]
async fn quotes_sends_joined_symbols() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/quotes"))
        .and(query_param("symbols", "AAPL,MSFT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"symbol": "AAPL", "last": "230.10", "volume": 1000},
            {"symbol": "MSFT", "last": "415.00", "volume": 2000}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let quotes = assert_ok!(
        client
            .quotes(
                &["AAPL".to_string(), "MSFT".to_string()],
                &CancellationToken::new(),
            )
            .await
    );

    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].symbol, "AAPL");
    assert_eq!(quotes[1].last, Decimal::new(41500, 2));
}

#[tokio::test]
async fn screener_rows_passes_limit() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/screener/live"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"rank": 1, "symbol": "NVDA", "score": "3.2", "last": "120.55"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let rows = assert_ok!(client.screener_rows(Some(20), &CancellationToken::new()).await);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].symbol, "NVDA");
}

/// Non-2xx responses map to `ClientError::Api` carrying the status code.
#[rstest]
#[case(401, false)]
#[case(404, false)]
#[case(500, true)]
#[case(503, true)]
#[tokio::test]
async fn error_status_maps_to_api_error(#[case] status: u16, #[case] retryable: bool) {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/account/status"))
        .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .account_status(&CancellationToken::new())
        .await
        .unwrap_err();

    match &err {
        ClientError::Api { code, message } => {
            assert_eq!(*code, i32::from(status));
            assert_eq!(message, "nope");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(err.is_retryable(), retryable);
    assert!(!err.is_cancellation());
}

/// Cancelling the token mid-flight yields `ClientError::Cancelled`.
#[tokio::test]
async fn cancelled_token_aborts_request() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/account/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"connected": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = CancellationToken::new();

    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let err = client.account_status(&token).await.unwrap_err();
    assert!(err.is_cancellation());
}
