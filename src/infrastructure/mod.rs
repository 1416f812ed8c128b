//! Infrastructure layer: adapters for the outside world.

pub mod config;
pub mod gateway;
pub mod setup;
