//! Console output helpers for CLI commands.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use console::style;

use crate::domain::models::{Config, RunStats};

/// Human-friendly console sections and status lines.
pub struct Reporter;

impl Reporter {
    pub fn section(title: &str) {
        println!("\n{}", style(title).bold());
        println!("{}", style("=".repeat(title.len())).dim());
    }

    pub fn info(message: &str) {
        println!("{} {message}", style("•").cyan());
    }

    pub fn success(message: &str) {
        println!("{} {message}", style("✓").green());
    }

    pub fn warning(message: &str) {
        println!("{} {message}", style("!").yellow());
    }

    pub fn error(message: &str) {
        println!("{} {message}", style("✗").red());
    }
}

/// Render the end-of-cycle summary as a table.
pub fn format_summary_table(stats: &RunStats, config: &Config) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

    table.add_row(vec![
        Cell::new("Shopify orders fetched"),
        Cell::new(stats.total_orders),
    ]);
    table.add_row(vec![
        Cell::new("High-value orders"),
        Cell::new(stats.high_value_orders),
    ]);
    table.add_row(vec![
        Cell::new("Slack messages sent"),
        Cell::new(stats.notifications_sent),
    ]);
    table.add_row(vec![
        Cell::new("Threshold"),
        Cell::new(format!("{:.2}", config.order_value_threshold)),
    ]);
    table.add_row(vec![
        Cell::new("Slack channel"),
        Cell::new(&config.slack_channel_id),
    ]);

    table.to_string()
}

/// Print a run summary, either as a table or as JSON.
pub fn render_summary(stats: &RunStats, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    Reporter::section("Run Summary");
    println!("{}", format_summary_table(stats, config));
    if stats.errors.is_empty() {
        Reporter::success("Completed without errors.");
    } else {
        Reporter::warning("Errors occurred:");
        for err in &stats.errors {
            Reporter::error(&format!("  {err}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_table_lists_all_metrics() {
        let stats = RunStats {
            total_orders: 12,
            high_value_orders: 3,
            notifications_sent: 2,
            errors: vec!["one failed".to_string()],
        };
        let config = Config {
            slack_channel_id: "C042".to_string(),
            ..Default::default()
        };

        let rendered = format_summary_table(&stats, &config);
        assert!(rendered.contains("Shopify orders fetched"));
        assert!(rendered.contains("12"));
        assert!(rendered.contains("High-value orders"));
        assert!(rendered.contains("Slack messages sent"));
        assert!(rendered.contains("500.00"));
        assert!(rendered.contains("C042"));
    }
}
