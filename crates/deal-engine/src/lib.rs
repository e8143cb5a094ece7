//! Deal scoring and counterparty matching for tax-credit finance projects.

pub mod config;
pub mod deals;
pub mod error;
pub mod import;
pub mod telemetry;
