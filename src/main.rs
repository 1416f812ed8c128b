//! Orderwatch CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use orderwatch::cli::commands::run::RunArgs;
use orderwatch::cli::commands::setup::SetupArgs;
use orderwatch::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            continuous,
            interval,
            threshold,
        } => {
            orderwatch::cli::commands::run::execute(
                RunArgs {
                    continuous,
                    interval,
                    threshold,
                    config_path: cli.config.clone(),
                },
                cli.json,
            )
            .await
        }
        Commands::Verify => {
            orderwatch::cli::commands::verify::execute(cli.config.clone(), cli.json).await
        }
        Commands::Setup {
            user_id,
            username,
            full_name,
            shop_domain,
            slack_channel,
        } => {
            orderwatch::cli::commands::setup::execute(
                SetupArgs {
                    user_id,
                    username,
                    full_name,
                    shop_domain,
                    slack_channel,
                    config_path: cli.config.clone(),
                },
                cli.json,
            )
            .await
        }
    };

    if let Err(err) = result {
        orderwatch::cli::handle_error(err, cli.json);
    }
}
