//! The `setup` command: provision a user and OAuth credentials, then
//! print the configuration to save.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::output::Reporter;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::gateway::{ConnectivityClient, DEFAULT_BASE_URL};
use crate::infrastructure::setup::{SetupFlow, SetupOptions};

pub struct SetupArgs {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub shop_domain: Option<String>,
    pub slack_channel: Option<String>,
    pub config_path: Option<PathBuf>,
}

pub async fn execute(args: SetupArgs, json: bool) -> Result<()> {
    let config = match args.config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }?;
    if config.api_key.is_empty() {
        bail!("api_key is required for setup; set it in orderwatch.yaml or ORDERWATCH_API_KEY");
    }

    if !json {
        Reporter::section("Credential Setup");
    }

    let client =
        ConnectivityClient::new(&config.api_key, &config.api_version, DEFAULT_BASE_URL)?;
    let flow = SetupFlow::new(&client, &config);
    let options = SetupOptions {
        user_id: args.user_id,
        username: args.username,
        full_name: args.full_name,
        shop_domain: args.shop_domain,
        slack_channel_id: args.slack_channel.clone(),
    };

    let result = flow.run(&options).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "user_id": result.user_id,
                "shopify_credential_id": result.shopify_credential_id,
                "slack_credential_id": result.slack_credential_id,
                "store_domain": result.store_domain,
            }))?
        );
        return Ok(());
    }

    Reporter::section("Setup Complete");
    Reporter::success(&format!("user_id: {}", result.user_id));
    Reporter::success(&format!(
        "shopify_credential_id: {}",
        result.shopify_credential_id
    ));
    Reporter::success(&format!(
        "slack_credential_id: {}",
        result.slack_credential_id
    ));

    println!("\nAdd this to orderwatch.yaml:");
    println!("  user_id: {}", result.user_id);
    println!("  shopify_credential_id: {}", result.shopify_credential_id);
    println!("  slack_credential_id: {}", result.slack_credential_id);
    if let Some(domain) = &result.store_domain {
        println!("  store_domain: {domain}");
    }
    if let Some(channel) = &args.slack_channel {
        println!("  slack_channel_id: {channel}");
    }

    Ok(())
}
