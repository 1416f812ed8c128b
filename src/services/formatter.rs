//! Builds the Slack Block Kit notification for a high-value order.

use crate::domain::models::{Block, OrderSummary, TextObject};

/// Formats order summaries into Slack block payloads.
///
/// Pure: the same summary and configuration always produce the same
/// blocks. The admin deep-link button is emitted only when both a store
/// domain and an order id are known.
pub struct MessageFormatter {
    store_domain: Option<String>,
}

impl MessageFormatter {
    pub fn new(store_domain: Option<String>) -> Self {
        Self { store_domain }
    }

    /// Build the notification blocks for one order.
    pub fn order_notification(&self, summary: &OrderSummary) -> Vec<Block> {
        let items_text = Self::items_text(summary);

        let mut blocks = vec![
            Block::header(format!("🎉 High-Value Order: #{}", summary.order_number)),
            Block::fields(vec![
                TextObject::mrkdwn(format!(
                    "*Total Amount:*\n{} {}",
                    summary.currency,
                    group_thousands(summary.total)
                )),
                TextObject::mrkdwn(format!("*Items:*\n{} item(s)", summary.items_count)),
            ]),
            Block::fields(vec![
                TextObject::mrkdwn(format!("*Customer:*\n{}", summary.customer_name)),
                TextObject::mrkdwn(format!("*Email:*\n{}", summary.customer_email)),
            ]),
            Block::fields(vec![
                TextObject::mrkdwn(format!("*Financial Status:*\n{}", summary.financial_status)),
                TextObject::mrkdwn(format!("*Created:*\n{}", summary.created_at_display)),
            ]),
            Block::text(format!("*Order Items:*\n{items_text}")),
            Block::text(format!("*Shipping To:*\n{}", summary.shipping_address)),
            Block::divider(),
        ];

        if let Some(url) = self.admin_url(summary.order_id.as_deref()) {
            blocks.push(Block::link_button("View in Shopify Admin", url));
        }

        blocks
    }

    fn items_text(summary: &OrderSummary) -> String {
        let mut lines: Vec<String> = summary
            .top_items
            .iter()
            .map(|item| {
                format!(
                    "• {}× {} ({} {:.2})",
                    item.quantity, item.name, summary.currency, item.price
                )
            })
            .collect();
        if summary.items_count > summary.top_items.len() {
            lines.push(format!(
                "• ...and {} more item(s)",
                summary.items_count - summary.top_items.len()
            ));
        }
        if lines.is_empty() {
            "No line items available".to_string()
        } else {
            lines.join("\n")
        }
    }

    fn admin_url(&self, order_id: Option<&str>) -> Option<String> {
        let domain = self.store_domain.as_deref().filter(|d| !d.is_empty())?;
        let order_id = order_id.filter(|id| !id.is_empty())?;
        Some(format!(
            "https://admin.shopify.com/store/{domain}/orders/{order_id}"
        ))
    }
}

/// Format a monetary value with two decimals and thousands separators,
/// e.g. `1,234.50`.
fn group_thousands(value: f64) -> String {
    let rendered = format!("{value:.2}");
    let (raw_int, frac) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (rendered, "00".to_string()),
    };
    let (sign, digits) = match raw_int.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw_int.as_str()),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac}")
}
