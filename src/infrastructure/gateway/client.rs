//! HTTP implementation of the [`Gateway`] port against the connectivity
//! API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::error::GatewayError;
use crate::domain::models::{Block, CredentialRecord};
use crate::domain::ports::Gateway;

use super::types::{
    ConnectorInfo, ConnectorsResponse, CreateUserRequest, CreateUserResponse,
    CredentialStartRequest, CredentialStartResponse, DataEnvelope, ExecutionData,
    ExecutionRequest, OrdersPayload,
};

pub const DEFAULT_BASE_URL: &str = "https://api.runalloy.com";

const LIST_ORDERS_ACTION: &str = "listOrders";
const POST_MESSAGE_ACTION: &str = "postMessage";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Thin client over the connectivity API.
///
/// All calls share one pooled connection, a bearer token, and a pinned
/// API version header. Responses are unwrapped from the `data` envelope
/// and non-success statuses are mapped to [`GatewayError`].
pub struct ConnectivityClient {
    http: ReqwestClient,
    base_url: String,
}

impl ConnectivityClient {
    /// Build a client for the given API key and version.
    pub fn new(api_key: &str, api_version: &str, base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .context("API key contains characters not valid in a header")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "x-api-version",
            HeaderValue::from_str(api_version).context("invalid API version")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = ReqwestClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        info!("connectivity API client initialized");
        Ok(Self {
            http,
            base_url: format!("{}/{api_version}", base_url.trim_end_matches('/')),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        debug!(path, "GET");
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .send()
            .await?;
        Self::read_response(response).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, GatewayError> {
        debug!(path, "POST");
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;
        Self::read_response(response).await
    }

    async fn read_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::from_status(status, body));
        }
        if body.is_empty() {
            return Ok(serde_json::from_value(Value::Object(
                serde_json::Map::new(),
            ))?);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn execute(&self, user_id: &str, request: &ExecutionRequest) -> Result<ExecutionData, GatewayError> {
        info!(
            connector = %request.connector_id,
            action = %request.action_id,
            user = user_id,
            "executing connector action"
        );
        let envelope: DataEnvelope<ExecutionData> = self
            .post(&format!("/users/{user_id}/executions"), request)
            .await?;
        debug!(
            execution_id = envelope.data.execution_id.as_deref().unwrap_or(""),
            status = envelope.data.status.as_deref().unwrap_or(""),
            "execution completed"
        );
        Ok(envelope.data)
    }

    /// Create a connectivity user and return its id.
    pub async fn create_user(
        &self,
        username: &str,
        full_name: &str,
    ) -> Result<CreateUserResponse, GatewayError> {
        info!(username, "creating user");
        self.post(
            "/users",
            &CreateUserRequest {
                username: username.to_string(),
                full_name: full_name.to_string(),
            },
        )
        .await
    }

    /// The connector catalog available to this API key.
    pub async fn list_connectors(&self) -> Result<Vec<ConnectorInfo>, GatewayError> {
        let response: ConnectorsResponse = self.get("/connectors", &[]).await?;
        let connectors = response.into_connectors();
        info!(count = connectors.len(), "listed connectors");
        Ok(connectors)
    }

    /// Begin credential creation for a connector, usually yielding an
    /// OAuth URL to visit.
    pub async fn start_credential(
        &self,
        connector_id: &str,
        request: &CredentialStartRequest,
    ) -> Result<CredentialStartResponse, GatewayError> {
        info!(connector = connector_id, "creating credential");
        self.post(&format!("/connectors/{connector_id}/credentials"), request)
            .await
    }
}

#[async_trait]
impl Gateway for ConnectivityClient {
    async fn list_credentials(
        &self,
        user_id: &str,
        connector_id: Option<&str>,
    ) -> Result<Vec<CredentialRecord>, GatewayError> {
        let query: Vec<(&str, &str)> = connector_id
            .map(|id| vec![("connectorId", id)])
            .unwrap_or_default();
        let envelope: DataEnvelope<Vec<CredentialRecord>> = self
            .get(&format!("/users/{user_id}/credentials"), &query)
            .await?;
        info!(
            count = envelope.data.len(),
            user = user_id,
            "retrieved credentials"
        );
        Ok(envelope.data)
    }

    async fn fetch_orders(
        &self,
        user_id: &str,
        connector_id: &str,
        credential_id: &str,
        limit: u32,
        query: &str,
    ) -> Result<Vec<Value>, GatewayError> {
        let execution = self
            .execute(
                user_id,
                &ExecutionRequest {
                    connector_id: connector_id.to_string(),
                    action_id: LIST_ORDERS_ACTION.to_string(),
                    credential_id: credential_id.to_string(),
                    request_body: None,
                    query_parameters: Some(json!({
                        "limit": limit,
                        "status": "any",
                        "query": query,
                    })),
                },
            )
            .await?;
        // Executions with no upstream payload come back with a null
        // responseData.
        let payload: OrdersPayload = if execution.response_data.is_null() {
            OrdersPayload::default()
        } else {
            serde_json::from_value(execution.response_data)?
        };
        Ok(payload.orders)
    }

    async fn post_message(
        &self,
        user_id: &str,
        connector_id: &str,
        credential_id: &str,
        channel: &str,
        blocks: &[Block],
    ) -> Result<(), GatewayError> {
        self.execute(
            user_id,
            &ExecutionRequest {
                connector_id: connector_id.to_string(),
                action_id: POST_MESSAGE_ACTION.to_string(),
                credential_id: credential_id.to_string(),
                request_body: Some(json!({
                    "channel": channel,
                    "blocks": blocks,
                })),
                query_parameters: None,
            },
        )
        .await?;
        Ok(())
    }
}
