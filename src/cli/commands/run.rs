//! The `run` command: one polling cycle, or a continuous loop.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use crate::cli::output::{render_summary, Reporter};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::gateway::{ConnectivityClient, DEFAULT_BASE_URL};
use crate::services::PollingCoordinator;

pub struct RunArgs {
    pub continuous: bool,
    pub interval: Option<u64>,
    pub threshold: Option<f64>,
    pub config_path: Option<PathBuf>,
}

pub async fn execute(args: RunArgs, json: bool) -> Result<()> {
    let mut config = load_config(args.config_path.as_deref())?;
    if let Some(threshold) = args.threshold {
        config.order_value_threshold = threshold;
    }
    if let Some(interval) = args.interval {
        config.check_interval_seconds = interval;
    }
    ConfigLoader::validate(&config)?;
    ConfigLoader::require_polling_settings(&config)?;

    let client =
        ConnectivityClient::new(&config.api_key, &config.api_version, DEFAULT_BASE_URL)?;
    let mut coordinator = PollingCoordinator::new(Arc::new(client), config.clone());

    if !json {
        Reporter::section("Verify Credentials");
        Reporter::info(&format!("User ID: {}", config.user_id));
    }
    coordinator
        .verify_setup()
        .await
        .context("credential verification failed")?;
    if !json {
        Reporter::success("All required credentials were found.");
    }

    if args.continuous {
        run_continuous(&mut coordinator, &config, json).await
    } else {
        let stats = coordinator.run_cycle().await?;
        render_summary(&stats, &config, json)
    }
}

async fn run_continuous(
    coordinator: &mut PollingCoordinator,
    config: &Config,
    json: bool,
) -> Result<()> {
    if !json {
        Reporter::section("Continuous Mode");
        Reporter::info(&format!(
            "Polling every {}s (threshold {:.2})",
            config.check_interval_seconds, config.order_value_threshold
        ));
        Reporter::info("Press Ctrl+C to stop");
    }

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "could not listen for shutdown signal");
        }
    };
    poll_until_shutdown(coordinator, config, json, shutdown).await
}

async fn poll_until_shutdown(
    coordinator: &mut PollingCoordinator,
    config: &Config,
    json: bool,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let interval = Duration::from_secs(config.check_interval_seconds);
    // The signal future lives across iterations, so an interrupt that
    // arrives while a cycle is in flight still stops the loop at the
    // next boundary; the in-flight cycle always completes.
    tokio::pin!(shutdown);
    loop {
        let stats = coordinator.run_cycle().await?;
        render_summary(&stats, config, json)?;

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = &mut shutdown => {
                if !json {
                    Reporter::warning("Stopped by user.");
                }
                return Ok(());
            }
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}
