//! Application configuration module.
//!
//! Manages the TOML config file holding the catalog API location and
//! pagination defaults.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_URL_ENV, AppConfig};
