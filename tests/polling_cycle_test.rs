//! End-to-end tests of the polling coordinator against a scripted
//! in-memory gateway.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orderwatch::domain::models::{Block, Config, CredentialRecord};
use orderwatch::domain::ports::Gateway;
use orderwatch::{GatewayError, PollingCoordinator, VerificationError};
use serde_json::{json, Value};

#[derive(Default)]
struct FakeGateway {
    /// Scripted results for successive fetch calls.
    fetch_results: Mutex<VecDeque<Result<Vec<Value>, GatewayError>>>,
    /// Scripted results for successive post calls; empty means succeed.
    post_results: Mutex<VecDeque<Result<(), GatewayError>>>,
    /// Successful posts, as (channel, blocks).
    posted: Mutex<Vec<(String, Vec<Block>)>>,
    /// Credentials per connector id.
    credentials: Mutex<HashMap<String, Vec<CredentialRecord>>>,
    /// Reject per-connector credential listings, forcing the combined
    /// fallback path.
    fail_scoped_listing: bool,
}

impl FakeGateway {
    fn with_credentials(ids: &[(&str, &str)]) -> Self {
        let gateway = Self::default();
        {
            let mut credentials = gateway.credentials.lock().unwrap();
            for (connector, id) in ids {
                credentials
                    .entry((*connector).to_string())
                    .or_default()
                    .push(CredentialRecord::new(*id));
            }
        }
        gateway
    }

    fn script_fetch(&self, result: Result<Vec<Value>, GatewayError>) {
        self.fetch_results.lock().unwrap().push_back(result);
    }

    fn script_post(&self, result: Result<(), GatewayError>) {
        self.post_results.lock().unwrap().push_back(result);
    }

    fn posted_count(&self) -> usize {
        self.posted.lock().unwrap().len()
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn list_credentials(
        &self,
        _user_id: &str,
        connector_id: Option<&str>,
    ) -> Result<Vec<CredentialRecord>, GatewayError> {
        match connector_id {
            Some(_) if self.fail_scoped_listing => Err(GatewayError::Api {
                status: 404,
                body: "scoped listing unsupported".to_string(),
            }),
            Some(id) => Ok(self
                .credentials
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .unwrap_or_default()),
            None => Ok(self
                .credentials
                .lock()
                .unwrap()
                .values()
                .flatten()
                .cloned()
                .collect()),
        }
    }

    async fn fetch_orders(
        &self,
        _user_id: &str,
        _connector_id: &str,
        _credential_id: &str,
        _limit: u32,
        query: &str,
    ) -> Result<Vec<Value>, GatewayError> {
        assert!(
            query.starts_with("created_at:>='") && query.ends_with("Z'"),
            "unexpected query filter: {query}"
        );
        self.fetch_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn post_message(
        &self,
        _user_id: &str,
        _connector_id: &str,
        _credential_id: &str,
        channel: &str,
        blocks: &[Block],
    ) -> Result<(), GatewayError> {
        let result = self
            .post_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()));
        if result.is_ok() {
            self.posted
                .lock()
                .unwrap()
                .push((channel.to_string(), blocks.to_vec()));
        }
        result
    }
}

fn test_config() -> Config {
    Config {
        api_key: "sk_test".to_string(),
        user_id: "u1".to_string(),
        shopify_credential_id: "cred_s".to_string(),
        slack_credential_id: "cred_k".to_string(),
        slack_channel_id: "C042".to_string(),
        store_domain: Some("acme".to_string()),
        ..Default::default()
    }
}

fn coordinator_with(gateway: Arc<FakeGateway>) -> PollingCoordinator {
    PollingCoordinator::new(gateway, test_config())
}

#[tokio::test]
async fn full_cycle_notifies_only_high_value_orders() {
    let gateway = Arc::new(FakeGateway::with_credentials(&[
        ("shopify", "cred_s"),
        ("slack", "cred_k"),
    ]));
    gateway.script_fetch(Ok(vec![
        json!({
            "id": 1,
            "order_number": 1001,
            "total_price": "750.00",
            "customer": {"first_name": "Ada", "last_name": "Lovelace"},
            "line_items": [{"name": "Widget", "quantity": 2, "price": "375.00"}]
        }),
        json!({
            "id": "gid://shopify/Order/2",
            "name": "#1002",
            "totalPrice": {"amount": "920.00", "currencyCode": "EUR"}
        }),
        json!({"id": 3, "total_price": "12.00"}),
    ]));

    let mut coordinator = coordinator_with(Arc::clone(&gateway));
    coordinator.verify_setup().await.expect("setup verifies");
    let stats = coordinator.run_cycle().await.expect("cycle succeeds");

    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.high_value_orders, 2);
    assert_eq!(stats.notifications_sent, 2);
    assert!(stats.errors.is_empty());
    assert_eq!(gateway.posted_count(), 2);

    let posted = gateway.posted.lock().unwrap();
    assert_eq!(posted[0].0, "C042");
    let first_blocks = serde_json::to_value(&posted[0].1).unwrap();
    assert_eq!(
        first_blocks[0]["text"]["text"],
        "🎉 High-Value Order: #1001"
    );
    // Flat order with an id and a store domain gets the admin button.
    let last = first_blocks.as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["type"], "actions");
    assert_eq!(
        last["elements"][0]["url"],
        "https://admin.shopify.com/store/acme/orders/1"
    );
}

#[tokio::test]
async fn watermark_advances_only_after_successful_fetch() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.script_fetch(Err(GatewayError::RateLimited));
    gateway.script_fetch(Ok(Vec::new()));

    let mut coordinator = coordinator_with(Arc::clone(&gateway));
    let initial = coordinator.last_check();

    let stats = coordinator.run_cycle().await.expect("non-fatal cycle");
    assert_eq!(stats.errors.len(), 1);
    assert_eq!(stats.total_orders, 0);
    assert_eq!(
        coordinator.last_check(),
        initial,
        "failed fetch must not advance the watermark"
    );

    let stats = coordinator.run_cycle().await.expect("empty cycle");
    assert!(stats.errors.is_empty());
    assert!(
        coordinator.last_check() > initial,
        "successful fetch advances the watermark"
    );
}

#[tokio::test]
async fn one_failed_notification_does_not_stop_the_rest() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.script_fetch(Ok(vec![
        json!({"id": 1, "total_price": "600.00"}),
        json!({"id": 2, "total_price": "700.00"}),
        json!({"id": 3, "total_price": "800.00"}),
    ]));
    gateway.script_post(Ok(()));
    gateway.script_post(Err(GatewayError::Api {
        status: 500,
        body: "kaboom".to_string(),
    }));
    gateway.script_post(Ok(()));

    let mut coordinator = coordinator_with(Arc::clone(&gateway));
    let before = coordinator.last_check();
    let stats = coordinator.run_cycle().await.expect("cycle completes");

    assert_eq!(stats.high_value_orders, 3);
    assert_eq!(stats.notifications_sent, 2);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].contains("kaboom"));
    assert_eq!(gateway.posted_count(), 2);
    assert!(
        coordinator.last_check() > before,
        "send failures do not freeze the watermark"
    );
}

#[tokio::test]
async fn low_threshold_scenario_counts_one_of_two() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.script_fetch(Ok(vec![
        json!({"id": 1, "total_price": "50.00"}),
        json!({"id": 2, "total_price": "250.00"}),
    ]));

    let mut config = test_config();
    config.order_value_threshold = 200.0;
    let mut coordinator = PollingCoordinator::new(Arc::clone(&gateway) as Arc<dyn Gateway>, config);
    let stats = coordinator.run_cycle().await.expect("cycle completes");

    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.high_value_orders, 1);
    assert_eq!(stats.notifications_sent, 1);
    assert!(stats.errors.is_empty());
    assert_eq!(gateway.posted_count(), 1);
}

#[tokio::test]
async fn unparseable_totals_are_excluded_without_recording_errors() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.script_fetch(Ok(vec![
        json!({"id": 1, "total_price": "not-a-number"}),
        json!({"id": 2, "total_price": "600.00"}),
    ]));

    let mut coordinator = coordinator_with(Arc::clone(&gateway));
    let stats = coordinator.run_cycle().await.expect("cycle completes");

    // Bad price data is skipped, not treated as a cycle failure.
    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.high_value_orders, 1);
    assert_eq!(stats.notifications_sent, 1);
    assert!(stats.errors.is_empty());
    assert_eq!(gateway.posted_count(), 1);
}

#[tokio::test]
async fn fatal_auth_error_aborts_the_cycle() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.script_fetch(Err(GatewayError::AuthFailed("bad key".to_string())));

    let mut coordinator = coordinator_with(gateway);
    let err = coordinator.run_cycle().await.expect_err("fatal error");
    assert!(err.is_fatal());
}

#[tokio::test]
async fn undecodable_records_are_skipped_but_counted() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.script_fetch(Ok(vec![
        json!("not an object"),
        json!({"id": 1, "total_price": "600.00"}),
    ]));

    let mut coordinator = coordinator_with(Arc::clone(&gateway));
    let stats = coordinator.run_cycle().await.expect("cycle completes");

    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.high_value_orders, 1);
    assert_eq!(stats.notifications_sent, 1);
    assert!(stats.errors.is_empty());
}

#[tokio::test]
async fn verify_setup_reports_missing_credentials() {
    let gateway = Arc::new(FakeGateway::with_credentials(&[("shopify", "cred_s")]));
    let coordinator = coordinator_with(gateway);

    let err = coordinator.verify_setup().await.expect_err("slack missing");
    match err {
        VerificationError::MissingCredentials(missing) => {
            assert_eq!(missing.len(), 1);
            assert!(missing[0].contains("cred_k"));
        }
        other => panic!("expected MissingCredentials, got {other:?}"),
    }
}

#[tokio::test]
async fn verify_setup_falls_back_to_combined_listing() {
    let mut gateway = FakeGateway::with_credentials(&[("shopify", "cred_s"), ("slack", "cred_k")]);
    gateway.fail_scoped_listing = true;

    let coordinator = coordinator_with(Arc::new(gateway));
    coordinator
        .verify_setup()
        .await
        .expect("combined listing should satisfy verification");
}
