//! Error types shared across the polling core.

use thiserror::Error;

/// Errors raised by the connectivity gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The API rejected the key or credential (HTTP 401 equivalent).
    #[error("authentication rejected: {0}")]
    AuthFailed(String),

    /// The broker applied rate limiting (HTTP 429 equivalent).
    #[error("rate limited by the connectivity API")]
    RateLimited,

    /// Any other non-2xx response.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Response payload did not match the expected envelope.
    #[error("unexpected response payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Build a typed error from an HTTP status and response body.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 => Self::AuthFailed("invalid API key or credential".to_string()),
            429 => Self::RateLimited,
            code => Self::Api { status: code, body },
        }
    }

    /// True for errors that cannot succeed on retry within this run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthFailed(_))
    }
}

/// Errors raised while verifying stored credentials at run start.
///
/// Verification failures are fatal for the run: notifications cannot
/// succeed without valid credentials.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("missing credential(s): {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    #[error("unable to list credentials: {0}")]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            GatewayError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            GatewayError::AuthFailed(_)
        ));
        assert!(matches!(
            GatewayError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            GatewayError::RateLimited
        ));
        assert!(matches!(
            GatewayError::from_status(StatusCode::BAD_GATEWAY, "oops".to_string()),
            GatewayError::Api { status: 502, .. }
        ));
    }

    #[test]
    fn only_auth_failures_are_fatal() {
        assert!(GatewayError::AuthFailed(String::new()).is_fatal());
        assert!(!GatewayError::RateLimited.is_fatal());
        assert!(!GatewayError::Api {
            status: 500,
            body: String::new()
        }
        .is_fatal());
    }
}
