//! Connectivity API adapter.

pub mod client;
pub mod types;

pub use client::{ConnectivityClient, DEFAULT_BASE_URL};
