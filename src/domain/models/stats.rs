//! Per-cycle run statistics.

use serde::Serialize;

/// Metrics aggregated over a single fetch-filter-notify cycle.
///
/// Created at cycle start, mutated only within the cycle, reported and
/// discarded afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Orders returned by the fetch step.
    pub total_orders: usize,

    /// Orders meeting the configured value threshold.
    pub high_value_orders: usize,

    /// Notifications delivered successfully.
    pub notifications_sent: usize,

    /// Error messages collected this cycle, in occurrence order. A fetch
    /// failure contributes one entry; each failed send contributes one.
    pub errors: Vec<String>,
}

impl RunStats {
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}
