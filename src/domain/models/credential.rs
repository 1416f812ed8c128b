//! Credential records as returned by the connectivity gateway.

use serde::{Deserialize, Serialize};

/// A stored authorization listed by the gateway for one user/connector
/// pair. Only read during steady-state polling, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub credential_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_id: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl CredentialRecord {
    pub fn new(credential_id: impl Into<String>) -> Self {
        Self {
            credential_id: credential_id.into(),
            connector_id: None,
            kind: None,
        }
    }
}
