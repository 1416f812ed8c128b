//! Integration tests for the connectivity API client against a mock
//! HTTP server.

use mockito::{Matcher, Server};
use orderwatch::domain::models::Block;
use orderwatch::domain::ports::Gateway;
use orderwatch::infrastructure::gateway::ConnectivityClient;
use orderwatch::GatewayError;
use serde_json::json;

const API_VERSION: &str = "2025-09";

fn client_for(server: &Server) -> ConnectivityClient {
    ConnectivityClient::new("test-api-key", API_VERSION, &server.url())
        .expect("client should build")
}

#[tokio::test]
async fn fetch_orders_returns_both_shapes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/2025-09/users/u1/executions")
        .match_header("authorization", "Bearer test-api-key")
        .match_header("x-api-version", API_VERSION)
        .match_body(Matcher::PartialJson(json!({
            "connectorId": "shopify",
            "actionId": "listOrders",
            "credentialId": "cred_s",
            "queryParameters": {"limit": 50, "status": "any"},
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": {
                    "executionId": "exec_1",
                    "status": "SUCCEEDED",
                    "responseData": {
                        "orders": [
                            {"id": 1, "total_price": "750.00"},
                            {
                                "id": "gid://shopify/Order/2",
                                "totalPrice": {"amount": "920.00", "currencyCode": "EUR"}
                            }
                        ]
                    }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let orders = client
        .fetch_orders("u1", "shopify", "cred_s", 50, "created_at:>='2024-01-01T00:00:00Z'")
        .await
        .expect("fetch should succeed");

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["total_price"], "750.00");
    assert_eq!(orders[1]["totalPrice"]["currencyCode"], "EUR");
    mock.assert_async().await;
}

#[tokio::test]
async fn fetch_orders_with_null_response_data_is_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/2025-09/users/u1/executions")
        .with_status(200)
        .with_body(json!({"data": {"executionId": "exec_2", "responseData": null}}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let orders = client
        .fetch_orders("u1", "shopify", "cred_s", 50, "")
        .await
        .expect("fetch should succeed");
    assert!(orders.is_empty());
}

#[tokio::test]
async fn unauthorized_maps_to_fatal_auth_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/2025-09/users/u1/executions")
        .with_status(401)
        .with_body(r#"{"error": "invalid key"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .fetch_orders("u1", "shopify", "cred_s", 50, "")
        .await
        .expect_err("401 should fail");

    assert!(matches!(err, GatewayError::AuthFailed(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn rate_limit_maps_to_retryable_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/2025-09/users/u1/executions")
        .with_status(429)
        .with_body(r#"{"error": "slow down"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .fetch_orders("u1", "shopify", "cred_s", 50, "")
        .await
        .expect_err("429 should fail");

    assert!(matches!(err, GatewayError::RateLimited));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn other_statuses_map_to_api_error_with_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/2025-09/users/u1/executions")
        .with_status(502)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .fetch_orders("u1", "shopify", "cred_s", 50, "")
        .await
        .expect_err("502 should fail");

    match err {
        GatewayError::Api { status, body } => {
            assert_eq!(status, 502);
            assert!(body.contains("upstream unavailable"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_credentials_scopes_by_connector() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/2025-09/users/u1/credentials")
        .match_query(Matcher::UrlEncoded(
            "connectorId".to_string(),
            "shopify".to_string(),
        ))
        .with_status(200)
        .with_body(
            json!({
                "data": [
                    {"credentialId": "cred_s", "connectorId": "shopify", "type": "oauth2"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let credentials = client
        .list_credentials("u1", Some("shopify"))
        .await
        .expect("listing should succeed");

    assert_eq!(credentials.len(), 1);
    assert_eq!(credentials[0].credential_id, "cred_s");
    assert_eq!(credentials[0].connector_id.as_deref(), Some("shopify"));
    mock.assert_async().await;
}

#[tokio::test]
async fn post_message_sends_block_kit_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/2025-09/users/u1/executions")
        .match_body(Matcher::PartialJson(json!({
            "connectorId": "slack",
            "actionId": "postMessage",
            "credentialId": "cred_k",
            "requestBody": {
                "channel": "C042",
                "blocks": [
                    {"type": "header", "text": {"type": "plain_text", "text": "hi"}},
                    {"type": "divider"}
                ]
            }
        })))
        .with_status(200)
        .with_body(json!({"data": {"executionId": "exec_3", "status": "SUCCEEDED"}}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let blocks = vec![Block::header("hi"), Block::divider()];
    client
        .post_message("u1", "slack", "cred_k", "C042", &blocks)
        .await
        .expect("post should succeed");
    mock.assert_async().await;
}
