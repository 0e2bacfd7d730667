//! Minimal-dependency core for the cadence scheduler: shared error types and
//! application configuration.

pub mod config;
pub mod error;
