//! Orchestrates one fetch-filter-notify cycle against the gateway.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use crate::domain::error::{GatewayError, VerificationError};
use crate::domain::models::{Config, RawOrder, RunStats};
use crate::domain::ports::Gateway;
use crate::services::filter::OrderFilter;
use crate::services::formatter::MessageFormatter;
use crate::services::normalizer::OrderNormalizer;

/// Maximum orders requested per fetch.
const FETCH_LIMIT: u32 = 50;

/// Drives polling cycles: fetch orders since the watermark, filter by
/// value, and post one Slack notification per qualifying order.
///
/// The watermark advances to "now" only after a successful fetch, so a
/// failed cycle retries the same window instead of silently dropping it.
pub struct PollingCoordinator {
    gateway: Arc<dyn Gateway>,
    config: Config,
    filter: OrderFilter,
    formatter: MessageFormatter,
    last_check: DateTime<Utc>,
}

impl PollingCoordinator {
    pub fn new(gateway: Arc<dyn Gateway>, config: Config) -> Self {
        let filter = OrderFilter::new(config.order_value_threshold);
        let formatter = MessageFormatter::new(config.store_domain.clone());
        Self {
            gateway,
            config,
            filter,
            formatter,
            // First cycle looks back one day.
            last_check: Utc::now() - Duration::hours(24),
        }
    }

    /// The lower bound of the next fetch window.
    pub fn last_check(&self) -> DateTime<Utc> {
        self.last_check
    }

    /// Confirm both configured credentials exist before polling starts.
    ///
    /// Per-connector listing is tried first; if the gateway rejects it,
    /// one combined listing serves as fallback.
    pub async fn verify_setup(&self) -> Result<(), VerificationError> {
        let user = &self.config.user_id;

        let (shopify_creds, slack_creds) = match (
            self.gateway
                .list_credentials(user, Some(&self.config.shopify_connector_id))
                .await,
            self.gateway
                .list_credentials(user, Some(&self.config.slack_connector_id))
                .await,
        ) {
            (Ok(shopify), Ok(slack)) => (shopify, slack),
            (shopify, slack) => {
                if let Err(err) = shopify.and(slack) {
                    warn!(%err, "per-connector credential listing failed, falling back");
                }
                let combined = self.gateway.list_credentials(user, None).await?;
                (combined.clone(), combined)
            }
        };

        let mut missing = Vec::new();
        if !shopify_creds
            .iter()
            .any(|c| c.credential_id == self.config.shopify_credential_id)
        {
            missing.push(format!("{} (Shopify)", self.config.shopify_credential_id));
        }
        if !slack_creds
            .iter()
            .any(|c| c.credential_id == self.config.slack_credential_id)
        {
            missing.push(format!("{} (Slack)", self.config.slack_credential_id));
        }

        if missing.is_empty() {
            info!("all required credentials found");
            Ok(())
        } else {
            Err(VerificationError::MissingCredentials(missing))
        }
    }

    /// Run one polling cycle and report its statistics.
    ///
    /// Non-fatal failures are recorded in the returned stats; an `Err` is
    /// reserved for fatal errors (rejected authentication) that make
    /// further cycles pointless.
    pub async fn run_cycle(&mut self) -> Result<RunStats, GatewayError> {
        let mut stats = RunStats::default();

        let created_at_min = shopify_timestamp(self.last_check);
        let query = format!("created_at:>='{created_at_min}'");
        info!(%created_at_min, "fetching orders");

        let records = match self
            .gateway
            .fetch_orders(
                &self.config.user_id,
                &self.config.shopify_connector_id,
                &self.config.shopify_credential_id,
                FETCH_LIMIT,
                &query,
            )
            .await
        {
            Ok(records) => records,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                let message = format!("failed to fetch orders: {err}");
                error!("{message}");
                stats.record_error(message);
                // Watermark stays put so the window is retried.
                return Ok(stats);
            }
        };

        stats.total_orders = records.len();

        let orders: Vec<RawOrder> = records
            .iter()
            .filter_map(|record| match RawOrder::from_value(record) {
                Ok(order) => Some(order),
                Err(err) => {
                    warn!(%err, "skipping undecodable order record");
                    None
                }
            })
            .collect();

        let high_value = self.filter.high_value(&orders);
        stats.high_value_orders = high_value.len();

        for order in high_value {
            let summary = OrderNormalizer::summarize(order);
            let blocks = self.formatter.order_notification(&summary);
            info!(order_number = %summary.order_number, "posting notification");
            match self
                .gateway
                .post_message(
                    &self.config.user_id,
                    &self.config.slack_connector_id,
                    &self.config.slack_credential_id,
                    &self.config.slack_channel_id,
                    &blocks,
                )
                .await
            {
                Ok(()) => stats.notifications_sent += 1,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    let message =
                        format!("failed to notify for order {}: {err}", summary.order_number);
                    error!("{message}");
                    stats.record_error(message);
                }
            }
        }

        self.last_check = Utc::now();
        Ok(stats)
    }
}

/// Second-precision UTC timestamp in the upstream query dialect,
/// e.g. `2024-01-15T10:30:00Z`.
fn shopify_timestamp(moment: DateTime<Utc>) -> String {
    moment.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
