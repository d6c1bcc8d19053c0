//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use moviex_api::catalog::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use moviex_db::StorageLayout;
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "MOVIEX_API_URL";

/// Default catalog API location.
const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v1/";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// List paging settings.
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Catalog API configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the API (version prefix included).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Paging configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PaginationConfig {
    /// Items per page when `--page-size` is not given.
    pub page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// `pagination.page_size` lies outside `1..=MAX_PAGE_SIZE`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let page_size = config.pagination.page_size;
        ensure!(
            (1..=MAX_PAGE_SIZE).contains(&page_size),
            "{}: pagination.page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}",
            path.display()
        );
        Ok(config)
    }

    /// Loads `config.toml` from the layout's config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(layout: &StorageLayout) -> Result<Self> {
        Self::load(&layout.config_file())
    }

    /// Resolves the API base URL; a non-empty `env_override` wins over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen value is not a valid URL.
    pub fn base_url(&self, env_override: Option<&str>) -> Result<Url> {
        let raw = env_override
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(&self.api.base_url);
        Url::parse(raw).with_context(|| format!("invalid API base URL: {raw}"))
    }
}
