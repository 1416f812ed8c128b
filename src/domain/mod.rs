//! Domain layer: models and port contracts for the order notifier.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{GatewayError, VerificationError};
