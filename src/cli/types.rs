//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "orderwatch")]
#[command(about = "Orderwatch - high-value Shopify order notifier for Slack", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from a specific file instead of the default chain
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll for new orders and notify Slack
    Run {
        /// Keep polling on an interval instead of running one cycle
        #[arg(long)]
        continuous: bool,

        /// Seconds between cycles in continuous mode
        #[arg(short, long)]
        interval: Option<u64>,

        /// Override the configured order value threshold
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Check that the configured credentials exist
    Verify,

    /// Provision a user and OAuth credentials for both connectors
    Setup {
        /// Reuse an existing user instead of creating one
        #[arg(long)]
        user_id: Option<String>,

        /// Username/email for the new user
        #[arg(short, long)]
        username: Option<String>,

        /// Full name for the new user
        #[arg(long)]
        full_name: Option<String>,

        /// Shopify store domain (subdomain or full domain)
        #[arg(long)]
        shop_domain: Option<String>,

        /// Slack channel ID to store in the emitted configuration
        #[arg(long)]
        slack_channel: Option<String>,
    },
}
