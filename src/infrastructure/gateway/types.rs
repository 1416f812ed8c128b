//! Wire types for the connectivity API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard `{"data": ...}` response envelope.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T: Default> {
    #[serde(default)]
    pub data: T,
}

/// Request body for `POST /users/{userId}/executions`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub connector_id: String,
    pub action_id: String,
    pub credential_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<Value>,
}

/// Execution result carried in the response envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionData {
    #[serde(default)]
    pub execution_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub response_data: Value,
}

/// The `responseData` payload of a Shopify `listOrders` execution.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersPayload {
    #[serde(default)]
    pub orders: Vec<Value>,
}

/// Request body for `POST /users`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub full_name: String,
}

/// `POST /users` returns the id at the top level.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Connector catalog response. Some deployments return the list under
/// `connectors`, others under `data`.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectorsResponse {
    #[serde(default)]
    pub connectors: Vec<ConnectorInfo>,
    #[serde(default)]
    pub data: Vec<ConnectorInfo>,
}

impl ConnectorsResponse {
    pub fn into_connectors(self) -> Vec<ConnectorInfo> {
        if self.connectors.is_empty() {
            self.data
        } else {
            self.connectors
        }
    }
}

/// Request body for `POST /connectors/{connectorId}/credentials`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStartRequest {
    pub user_id: String,
    pub authentication_type: String,
    pub redirect_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Response to a credential creation request. OAuth connectors return a
/// URL to visit; key-based connectors return the id directly.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStartResponse {
    #[serde(default)]
    pub oauth_url: Option<String>,
    #[serde(default)]
    pub credential_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn execution_request_omits_absent_sections() {
        let request = ExecutionRequest {
            connector_id: "shopify".to_string(),
            action_id: "listOrders".to_string(),
            credential_id: "cred_1".to_string(),
            request_body: None,
            query_parameters: Some(json!({"limit": 50})),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("requestBody").is_none());
        assert_eq!(value["queryParameters"]["limit"], 50);
        assert_eq!(value["connectorId"], "shopify");
    }

    #[test]
    fn orders_payload_defaults_to_empty() {
        let payload: OrdersPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.orders.is_empty());
    }

    #[test]
    fn connectors_fall_back_to_data_key() {
        let response: ConnectorsResponse =
            serde_json::from_value(json!({"data": [{"id": "slack", "name": "Slack"}]})).unwrap();
        let connectors = response.into_connectors();
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].id, "slack");
    }
}
