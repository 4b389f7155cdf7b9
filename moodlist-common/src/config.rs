//! Configuration loading and config file resolution
//!
//! Bootstrap configuration comes from a single TOML file. The file is located
//! in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `MOODLIST_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/moodlist/config.toml` on Linux)
//! 4. Built-in defaults (no file at all)
//!
//! An explicitly named file (1 or 2) that does not exist is an error. A
//! missing file in the platform config directory is not: the service starts
//! with defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MOODLIST_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    ///
    /// Default: 5780
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Generative model provider settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Music catalog provider settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Synthesis engine tuning
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Generative text model settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Base URL of the chat-completions API
    pub api_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// API key (environment variables take precedence)
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Music catalog settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog web API
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Minimum spacing between catalog requests in milliseconds
    pub min_request_interval_ms: u64,
}

/// Synthesis engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Generate/parse/resolve rounds before giving up
    pub attempt_budget: u32,
    /// Playlist size used when a request does not name one
    pub default_target_size: usize,
    /// Maximum playlist name length in characters
    pub playlist_name_max_len: usize,
    /// Top up exhausted theme runs with catalog recommendations
    pub recommendation_fallback: bool,
    /// Fixed seed for fallback genre selection (random when absent)
    pub random_seed: Option<u64>,
}

fn default_port() -> u16 {
    5780
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            logging: LoggingConfig::default(),
            model: ModelConfig::default(),
            catalog: CatalogConfig::default(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: "https://openrouter.ai/api/v1".to_string(),
            model: "google/gemini-2.5-flash-lite-preview-06-17".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.spotify.com/v1".to_string(),
            timeout_secs: 15,
            min_request_interval_ms: 50,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            attempt_budget: 3,
            default_target_size: 10,
            playlist_name_max_len: 100,
            recommendation_fallback: false,
            random_seed: None,
        }
    }
}

impl TomlConfig {
    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.synthesis.attempt_budget == 0 {
            return Err(Error::Config(
                "synthesis.attempt_budget must be at least 1".to_string(),
            ));
        }
        if self.synthesis.default_target_size == 0 {
            return Err(Error::Config(
                "synthesis.default_target_size must be at least 1".to_string(),
            ));
        }
        if self.synthesis.playlist_name_max_len == 0 {
            return Err(Error::Config(
                "synthesis.playlist_name_max_len must be at least 1".to_string(),
            ));
        }
        if self.model.timeout_secs == 0 || self.catalog.timeout_secs == 0 {
            return Err(Error::Config("timeouts must be at least 1 second".to_string()));
        }
        Ok(())
    }
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("moodlist").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Resolve and load the bootstrap configuration
///
/// See the module documentation for the resolution order.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return load_toml_config(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return load_toml_config(Path::new(&path));
        }
    }

    // Priority 3: Platform config directory
    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_toml_config(&path);
        }
    }

    // Priority 4: Built-in defaults
    info!("No config file found, using built-in defaults");
    Ok(TomlConfig::default())
}
