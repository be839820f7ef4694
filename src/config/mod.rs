//! Dashboard Configuration Module
//!
//! Endpoint URLs, HTTP client settings and the API bind address, loaded
//! from TOML.
//!
//! ## Loading Order
//!
//! 1. `SMARTFARM_CONFIG` environment variable (path to TOML file)
//! 2. `smartfarm.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded config is passed explicitly to the client and the API; there
//! is no global instance.

mod dashboard_config;
pub mod defaults;
pub mod validation;

pub use dashboard_config::*;
