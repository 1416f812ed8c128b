//! One-time credential provisioning against the connectivity API.
//!
//! Creates (or reuses) a user, walks the OAuth flow for the Shopify and
//! Slack connectors, and captures each authorization through a short-lived
//! local callback listener. The listener hands each callback to the flow
//! over a channel and is torn down once setup completes.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::models::Config;
use crate::domain::ports::Gateway;
use crate::infrastructure::gateway::types::CredentialStartRequest;
use crate::infrastructure::gateway::ConnectivityClient;

pub const CALLBACK_PORT: u16 = 8080;
pub const CALLBACK_PATH: &str = "/callback";

/// How long to wait for the user to finish an OAuth authorization.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Short grace period for the broker to finish storing the credential
/// after the callback fires.
const CREDENTIAL_SETTLE: Duration = Duration::from_secs(2);

const SUCCESS_HTML: &str = "<!DOCTYPE html>\
<html><head><title>Authorization Complete</title></head>\
<body style=\"font-family: sans-serif; text-align: center; padding-top: 4rem;\">\
<h1>Authorization Successful!</h1>\
<p>You can close this window and return to the terminal.</p>\
</body></html>";

/// Inputs for the bootstrap flow; all optional values fall back to
/// prompting-free defaults or fail with an explanatory error.
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub shop_domain: Option<String>,
    pub slack_channel_id: Option<String>,
}

/// Identifiers produced by the bootstrap flow.
#[derive(Debug, Clone)]
pub struct SetupResult {
    pub user_id: String,
    pub shopify_credential_id: String,
    pub slack_credential_id: String,
    pub store_domain: Option<String>,
}

/// Drives the provisioning steps in order.
pub struct SetupFlow<'a> {
    client: &'a ConnectivityClient,
    config: &'a Config,
}

impl<'a> SetupFlow<'a> {
    pub fn new(client: &'a ConnectivityClient, config: &'a Config) -> Self {
        Self { client, config }
    }

    pub async fn run(&self, options: &SetupOptions) -> Result<SetupResult> {
        let listener = CallbackListener::bind(CALLBACK_PORT).await?;
        info!(uri = %redirect_uri(), "OAuth callback listener started");

        let user_id = self.resolve_user(options).await?;
        self.check_connectors().await?;

        let store_domain = options.shop_domain.as_deref().map(sanitize_shop_domain);

        let shopify_credential_id = self
            .create_oauth_credential(
                &listener,
                &user_id,
                &self.config.shopify_connector_id,
                store_domain
                    .as_deref()
                    .map(|shop| serde_json::json!({"shopName": shop})),
            )
            .await
            .context("Shopify credential setup failed")?;

        let slack_credential_id = self
            .create_oauth_credential(&listener, &user_id, &self.config.slack_connector_id, None)
            .await
            .context("Slack credential setup failed")?;

        Ok(SetupResult {
            user_id,
            shopify_credential_id,
            slack_credential_id,
            store_domain,
        })
    }

    async fn resolve_user(&self, options: &SetupOptions) -> Result<String> {
        if let Some(existing) = options
            .user_id
            .as_deref()
            .or((!self.config.user_id.is_empty()).then_some(self.config.user_id.as_str()))
        {
            info!(user_id = existing, "reusing existing user");
            return Ok(existing.to_string());
        }

        let Some(username) = options.username.as_deref() else {
            bail!("no user id configured; pass --username to create one");
        };
        let full_name = options.full_name.as_deref().unwrap_or(username);

        let response = self.client.create_user(username, full_name).await?;
        let user_id = response
            .user_id
            .context("user creation response did not include a user id")?;
        info!(%user_id, "user created");
        Ok(user_id)
    }

    async fn check_connectors(&self) -> Result<()> {
        let connectors = self.client.list_connectors().await?;
        for required in [
            &self.config.shopify_connector_id,
            &self.config.slack_connector_id,
        ] {
            if !connectors.iter().any(|c| &c.id == required) {
                bail!("connector '{required}' is not available for this API key");
            }
        }
        Ok(())
    }

    /// Start credential creation, walk the OAuth flow if one is required,
    /// and return the resulting credential id.
    async fn create_oauth_credential(
        &self,
        listener: &CallbackListener,
        user_id: &str,
        connector_id: &str,
        data: Option<serde_json::Value>,
    ) -> Result<String> {
        let response = self
            .client
            .start_credential(
                connector_id,
                &CredentialStartRequest {
                    user_id: user_id.to_string(),
                    authentication_type: "oauth2".to_string(),
                    redirect_uri: redirect_uri(),
                    data,
                },
            )
            .await?;

        if let Some(oauth_url) = response.oauth_url {
            println!("\nOpen this link in your browser to authorize {connector_id}:");
            println!("  {oauth_url}");
            println!("Waiting for authorization (up to 5 minutes)...");

            let params = listener.wait(CALLBACK_TIMEOUT).await?;
            debug!(?params, "authorization callback received");
            tokio::time::sleep(CREDENTIAL_SETTLE).await;

            // The broker stores the credential asynchronously; the newest
            // entry for this connector is the one just authorized.
            let credentials = self
                .client
                .list_credentials(user_id, Some(connector_id))
                .await?;
            return credentials
                .last()
                .map(|c| c.credential_id.clone())
                .with_context(|| {
                    format!("no {connector_id} credential found after authorization")
                });
        }

        response
            .credential_id
            .with_context(|| format!("credential response for {connector_id} had no id"))
    }
}

/// Captures OAuth redirects on a local port, one per [`wait`] call.
///
/// [`wait`]: CallbackListener::wait
pub struct CallbackListener {
    accept_task: JoinHandle<()>,
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<HashMap<String, String>>>,
}

impl CallbackListener {
    pub async fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("could not bind callback listener on port {port}"))?;
        let (tx, rx) = mpsc::unbounded_channel();

        let accept_task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                match serve_callback(stream).await {
                    Ok(Some(params)) => {
                        if tx.send(params).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => warn!(%err, "callback connection failed"),
                }
            }
        });

        Ok(Self {
            accept_task,
            rx: tokio::sync::Mutex::new(rx),
        })
    }

    /// Wait for the next redirect, failing if the timeout elapses first.
    pub async fn wait(&self, timeout: Duration) -> Result<HashMap<String, String>> {
        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(params)) => Ok(params),
            Ok(None) => bail!("callback listener stopped before a redirect arrived"),
            Err(_) => bail!("authorization callback timed out"),
        }
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

/// Answer one HTTP request; returns the query parameters when it was the
/// expected callback.
async fn serve_callback(mut stream: TcpStream) -> Result<Option<HashMap<String, String>>> {
    let mut buf = vec![0u8; 8192];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    if path != CALLBACK_PATH {
        stream
            .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n")
            .await?;
        return Ok(None);
    }

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        SUCCESS_HTML.len(),
        SUCCESS_HTML
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;

    Ok(Some(parse_query(query)))
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

fn redirect_uri() -> String {
    format!("http://localhost:{CALLBACK_PORT}{CALLBACK_PATH}")
}

/// Reduce a pasted store domain to the bare subdomain.
pub fn sanitize_shop_domain(domain: &str) -> String {
    domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .trim_end_matches(".myshopify.com")
        .to_string()
}
