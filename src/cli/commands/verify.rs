//! The `verify` command: confirm both credentials exist, then exit.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::cli::output::Reporter;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::gateway::{ConnectivityClient, DEFAULT_BASE_URL};
use crate::services::PollingCoordinator;

pub async fn execute(config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }?;
    ConfigLoader::require_polling_settings(&config)?;

    let client =
        ConnectivityClient::new(&config.api_key, &config.api_version, DEFAULT_BASE_URL)?;
    let coordinator = PollingCoordinator::new(Arc::new(client), config.clone());

    if !json {
        Reporter::section("Verify Credentials");
        Reporter::info(&format!("User ID: {}", config.user_id));
    }

    match coordinator.verify_setup().await {
        Ok(()) => {
            if json {
                println!("{}", serde_json::json!({"verified": true}));
            } else {
                Reporter::success("All required credentials were found.");
            }
            Ok(())
        }
        Err(err) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({"verified": false, "error": err.to_string()})
                );
            } else {
                Reporter::error(&err.to_string());
            }
            Err(err.into())
        }
    }
}
