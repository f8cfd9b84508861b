//! Bootstrap configuration loading
//!
//! Configuration file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `TRAINING_CONFIG` environment variable
//! 3. User config file (`~/.config/training/config.toml`)
//! 4. System config file (`/etc/training/config.toml`)
//! 5. Compiled defaults (fallback)
//!
//! A missing configuration file is not fatal: the service logs a warning and
//! starts with compiled defaults. A file that exists but cannot be parsed is
//! an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "TRAINING_CONFIG";

/// Bootstrap configuration loaded from TOML
///
/// These settings cannot change while the service is running.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the membership directory service
    #[serde(default = "default_membership_url")]
    pub membership_url: String,

    /// Request timeout for membership lookups (no timeout when absent)
    #[serde(default)]
    pub membership_timeout_ms: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// List endpoint page size limits
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Page size used when the request does not send a valid `limit`
    #[serde(default = "default_limit")]
    pub default_limit: i64,

    /// Largest page size a request may ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
}

fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("training").join("training.db"))
        .unwrap_or_else(|| PathBuf::from("./training_data/training.db"))
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5730
}

fn default_membership_url() -> String {
    "http://127.0.0.1:5731".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_limit() -> i64 {
    50
}

fn default_max_limit() -> i64 {
    100
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            bind_addr: default_bind_addr(),
            port: default_port(),
            membership_url: default_membership_url(),
            membership_timeout_ms: None,
            logging: LoggingConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl TomlConfig {
    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.pagination.default_limit < 1 {
            return Err(Error::Config(format!(
                "pagination.default_limit must be at least 1 (got {})",
                self.pagination.default_limit
            )));
        }
        if self.pagination.max_limit < self.pagination.default_limit {
            return Err(Error::Config(format!(
                "pagination.max_limit ({}) must not be smaller than pagination.default_limit ({})",
                self.pagination.max_limit, self.pagination.default_limit
            )));
        }
        if self.membership_url.trim().is_empty() {
            return Err(Error::Config("membership_url must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Locate the configuration file following the documented priority order
///
/// Explicit locations (CLI argument, environment variable) are returned even
/// when the file does not exist, so that loading reports the mistake instead
/// of silently falling back to defaults.
pub fn find_config_file(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: User config file
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("training").join("config.toml")) {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    // Priority 4: System config file
    let system_config = PathBuf::from("/etc/training/config.toml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Configuration together with the file it was read from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// `None` when no file was found and compiled defaults apply
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    /// Report where the configuration came from
    ///
    /// Loading happens before the tracing subscriber exists (the log level
    /// lives in the file), so the outcome is logged separately.
    pub fn log_source(&self) {
        match &self.source {
            Some(path) => info!("Loaded configuration from {}", path.display()),
            None => warn!("No configuration file found, using compiled defaults"),
        }
    }
}

/// Load bootstrap configuration, falling back to compiled defaults
pub fn load_config(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    match find_config_file(cli_arg) {
        Some(path) => Ok(LoadedConfig {
            config: load_toml_config(&path)?,
            source: Some(path),
        }),
        None => Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: None,
        }),
    }
}
