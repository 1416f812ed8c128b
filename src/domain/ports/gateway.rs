//! Gateway port: the capability contract the polling core requires from
//! the connectivity broker.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::GatewayError;
use crate::domain::models::{Block, CredentialRecord};

/// Executes named actions against named connectors on behalf of a user.
///
/// The core only depends on this trait; the HTTP implementation lives in
/// the infrastructure layer and tests substitute scripted fakes.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// List stored credentials for a user, optionally scoped to one
    /// connector.
    async fn list_credentials(
        &self,
        user_id: &str,
        connector_id: Option<&str>,
    ) -> Result<Vec<CredentialRecord>, GatewayError>;

    /// Execute the order-listing action and return the raw order records.
    ///
    /// `query` is the upstream filter-string dialect, e.g.
    /// `created_at:>='2024-01-01T00:00:00Z'`.
    async fn fetch_orders(
        &self,
        user_id: &str,
        connector_id: &str,
        credential_id: &str,
        limit: u32,
        query: &str,
    ) -> Result<Vec<Value>, GatewayError>;

    /// Execute the message-post action with a Block Kit payload.
    async fn post_message(
        &self,
        user_id: &str,
        connector_id: &str,
        credential_id: &str,
        channel: &str,
        blocks: &[Block],
    ) -> Result<(), GatewayError>;
}
