//! Port trait definitions (Hexagonal Architecture)
//!
//! The domain declares the contracts infrastructure adapters must
//! implement. For this crate that is a single port: the connectivity
//! gateway that fronts both the order platform and the messaging
//! platform.

pub mod gateway;

pub use gateway::Gateway;
