//! Projects raw upstream orders into the canonical [`OrderSummary`].
//!
//! Normalization is pure and total: any decoded order produces a summary,
//! with documented fallbacks for absent fields. Both upstream shapes map
//! to the same projection so the filter and formatter never see shape
//! differences.

use chrono::DateTime;

use crate::domain::models::{
    Amount, FlatOrder, GraphMoney, GraphOrder, LineItemConnection, OrderSummary, RawOrder, TopItem,
};

/// How many line items appear verbatim in a notification body.
const TOP_ITEMS_LIMIT: usize = 3;

pub struct OrderNormalizer;

impl OrderNormalizer {
    /// Build the canonical summary for one order.
    pub fn summarize(order: &RawOrder) -> OrderSummary {
        match order {
            RawOrder::Flat(o) => Self::summarize_flat(o),
            RawOrder::Graph(o) => Self::summarize_graph(o),
        }
    }

    fn summarize_flat(o: &FlatOrder) -> OrderSummary {
        let created_at = o.created_at.clone().unwrap_or_default();
        OrderSummary {
            order_id: o.id.as_ref().map(ToString::to_string),
            order_number: o
                .order_number
                .as_ref()
                .map_or_else(|| "Unknown".to_string(), ToString::to_string),
            total: o
                .total_price
                .as_ref()
                .and_then(Amount::parse)
                .or_else(|| o.current_total_price.as_ref().and_then(Amount::parse))
                .unwrap_or(0.0),
            currency: o.currency.clone().unwrap_or_else(|| "USD".to_string()),
            customer_name: customer_name(
                o.customer.as_ref().and_then(|c| c.first_name.as_deref()),
                o.customer.as_ref().and_then(|c| c.last_name.as_deref()),
                o.customer.as_ref().and_then(|c| c.email.as_deref()),
            ),
            customer_email: o
                .customer
                .as_ref()
                .and_then(|c| c.email.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            items_count: o.line_items.len(),
            top_items: o
                .line_items
                .iter()
                .take(TOP_ITEMS_LIMIT)
                .map(|item| TopItem {
                    name: item
                        .name
                        .clone()
                        .unwrap_or_else(|| "Unknown Item".to_string()),
                    quantity: item.quantity.unwrap_or(1),
                    price: item.price.as_ref().and_then(|p| p.parse()).unwrap_or(0.0),
                })
                .collect(),
            shipping_address: format_address(
                o.shipping_address.as_ref().map(|a| {
                    (
                        a.city.as_deref(),
                        a.province_code.as_deref(),
                        a.country_code.as_deref(),
                    )
                }),
            ),
            created_at_display: format_timestamp(&created_at),
            created_at,
            financial_status: o
                .financial_status
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    fn summarize_graph(o: &GraphOrder) -> OrderSummary {
        let created_at = o.created_at.clone().unwrap_or_default();
        // The order-level currency field wins; the money object's
        // currencyCode is the fallback.
        let currency = o
            .currency
            .clone()
            .or_else(|| {
                o.total_price
                    .as_ref()
                    .and_then(GraphMoney::currency_code)
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| "USD".to_string());
        let items = o
            .line_items
            .as_ref()
            .map(LineItemConnection::items)
            .unwrap_or_default();

        OrderSummary {
            order_id: o.id.as_ref().map(ToString::to_string),
            // The GraphQL shape carries a display name like `#1001`.
            order_number: o.name.as_deref().map_or_else(
                || "Unknown".to_string(),
                |name| name.trim_start_matches('#').to_string(),
            ),
            total: o
                .total_price
                .as_ref()
                .and_then(GraphMoney::amount)
                .unwrap_or(0.0),
            currency,
            customer_name: customer_name(
                o.customer.as_ref().and_then(|c| c.first_name.as_deref()),
                o.customer.as_ref().and_then(|c| c.last_name.as_deref()),
                o.customer.as_ref().and_then(|c| c.email.as_deref()),
            ),
            customer_email: o
                .customer
                .as_ref()
                .and_then(|c| c.email.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            items_count: items.len(),
            top_items: items
                .iter()
                .take(TOP_ITEMS_LIMIT)
                .map(|item| TopItem {
                    name: item
                        .name
                        .clone()
                        .unwrap_or_else(|| "Unknown Item".to_string()),
                    quantity: item.quantity.unwrap_or(1),
                    price: item
                        .price
                        .as_ref()
                        .and_then(GraphMoney::amount)
                        .unwrap_or(0.0),
                })
                .collect(),
            shipping_address: format_address(
                o.shipping_address.as_ref().map(|a| {
                    (
                        a.city.as_deref(),
                        a.province_code.as_deref(),
                        a.country_code.as_deref(),
                    )
                }),
            ),
            created_at_display: format_timestamp(&created_at),
            created_at,
            financial_status: o
                .display_financial_status
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

fn customer_name(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> String {
    let name = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""))
        .trim()
        .to_string();
    if name.is_empty() {
        email.unwrap_or("Unknown Customer").to_string()
    } else {
        name
    }
}

fn format_address(address: Option<(Option<&str>, Option<&str>, Option<&str>)>) -> String {
    let Some((city, province, country)) = address else {
        return "No shipping address".to_string();
    };
    let parts: Vec<&str> = [city, province, country]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    parts.join(", ")
}

/// Render an RFC 3339 timestamp for humans, e.g. `Jan 15, 2024 10:30 UTC`.
/// Unparseable input is passed through verbatim.
fn format_timestamp(timestamp: &str) -> String {
    if timestamp.is_empty() {
        return String::new();
    }
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(&chrono::Utc)
            .format("%b %d, %Y %H:%M UTC")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}
