//! Command-line interface layer.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

/// Print a top-level error and exit nonzero.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        eprintln!(
            "{}",
            serde_json::json!({"error": format!("{err:#}")})
        );
    } else {
        output::Reporter::error(&format!("{err:#}"));
    }
    std::process::exit(1);
}
