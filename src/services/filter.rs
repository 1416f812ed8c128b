//! High-value order selection.

use tracing::{info, warn};

use crate::domain::models::RawOrder;

/// Selects orders whose resolved total meets a configured threshold.
pub struct OrderFilter {
    threshold: f64,
}

impl OrderFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Return the orders at or above the threshold, preserving input order.
    ///
    /// The comparison is inclusive. Orders without a stable identifier or
    /// a resolvable total are skipped with a warning rather than treated
    /// as zero: an unparseable price is bad data, not a free order.
    pub fn high_value<'a>(&self, orders: &'a [RawOrder]) -> Vec<&'a RawOrder> {
        let mut qualifying = Vec::new();
        for order in orders {
            if order.ident().is_none() {
                warn!("skipping order without a stable identifier");
                continue;
            }
            let Some(total) = order.resolved_total() else {
                warn!(
                    order_id = %order.ident().map(ToString::to_string).unwrap_or_default(),
                    "skipping order with unresolvable total"
                );
                continue;
            };
            if total >= self.threshold {
                info!(
                    order_id = %order.ident().map(ToString::to_string).unwrap_or_default(),
                    total,
                    "high-value order detected"
                );
                qualifying.push(order);
            }
        }
        info!(
            qualifying = qualifying.len(),
            total = orders.len(),
            "filtered orders above threshold"
        );
        qualifying
    }
}
