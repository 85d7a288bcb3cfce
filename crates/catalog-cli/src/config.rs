//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags ([`AppConfig::with_overrides`])
//! 2. Environment variables: `CATALOG_` prefix, `__` between sections,
//!    e.g. `CATALOG_API__BASE_URL`
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use catalog_adapters::{DEFAULT_BASE_URL, DEFAULT_QUIET_PERIOD, DEFAULT_TIMEOUT, HttpGatewayConfig};
use catalog_core::domain::query::DEFAULT_PAGE_SIZE;

use crate::cli::{GlobalArgs, ListFormat};

const ENV_PREFIX: &str = "CATALOG";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend connection.
    pub api: ApiConfig,
    /// Listing defaults.
    pub list: ListConfig,
    /// Debounced search.
    pub search: SearchConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log sinks.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub page_size: u32,
    /// Sort used when `--sort` is not given, e.g. `name,asc`. Separate
    /// several keys with `;`.
    pub sort: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort: "id,asc".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Listing format used when `--format` is not given.
    pub format: ListFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("Failed to build default config")?;

        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::from(Self::config_path()).required(false),
        };

        Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Apply the flags that take precedence over every other source.
    pub fn with_overrides(mut self, args: &GlobalArgs) -> Self {
        if let Some(base_url) = &args.base_url {
            self.api.base_url = base_url.clone();
        }
        if args.no_color {
            self.output.no_color = true;
        }
        if let Some(file) = &args.log_file {
            self.logging.file = Some(file.clone());
        }
        self
    }

    /// Connection settings for the HTTP gateway.
    pub fn gateway_config(&self) -> HttpGatewayConfig {
        HttpGatewayConfig::new(&self.api.base_url)
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.catalog.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "catalog", "catalog")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".catalog.toml"))
    }

    /// The file this run reads: `--config` if given, else the default.
    pub fn active_path(args: &GlobalArgs) -> PathBuf {
        args.config.clone().unwrap_or_else(Self::config_path)
    }
}
