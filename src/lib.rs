//! Orderwatch: watches a Shopify store through a connectivity broker and
//! posts Slack notifications for high-value orders.
//!
//! The crate is layered hexagonally: `domain` holds models and the
//! gateway port, `services` the polling pipeline (normalize, filter,
//! format, coordinate), `infrastructure` the HTTP adapter, configuration
//! loading, and the one-time credential setup flow, and `cli` the
//! commands.

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::error::{GatewayError, VerificationError};
pub use domain::models::{Config, OrderSummary, RawOrder, RunStats};
pub use domain::ports::Gateway;
pub use services::PollingCoordinator;
