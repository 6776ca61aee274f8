use anyhow::{Context, bail};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Cross-origin access policy
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CorsConfig {
  /// The single origin allowed to call the API
  #[serde(default = "default_allow_origin")]
  pub allow_origin: String,
  /// How long browsers may cache a preflight response, in seconds
  #[serde(default = "default_max_age_secs")]
  pub max_age_secs: u64,
}

fn default_allow_origin() -> String {
  "http://localhost:5173".to_string()
}

fn default_max_age_secs() -> u64 {
  12 * 60 * 60
}

impl Default for CorsConfig {
  fn default() -> Self {
    Self {
      allow_origin: default_allow_origin(),
      max_age_secs: default_max_age_secs(),
    }
  }
}

impl CorsConfig {
  pub fn origin(&self) -> anyhow::Result<HeaderValue> {
    // A wildcard origin cannot be combined with credentials.
    if self.allow_origin == "*" {
      bail!("cors.allow_origin must name a single origin, not '*'");
    }
    HeaderValue::from_str(&self.allow_origin)
      .with_context(|| format!("Invalid CORS origin '{}'", self.allow_origin))
  }

  pub fn max_age(&self) -> Duration {
    Duration::from_secs(self.max_age_secs)
  }
}

/// Bookshelf server configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
  /// HTTP listening address
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  /// Largest accepted request body, in bytes
  #[serde(default = "default_max_body_bytes")]
  pub max_body_bytes: usize,

  /// CORS configuration
  #[serde(default)]
  pub cors: CorsConfig,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,
}

fn default_server_addr() -> String {
  "127.0.0.1:8888".to_string()
}

fn default_max_body_bytes() -> usize {
  4 * 1024 * 1024
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server_addr: default_server_addr(),
      max_body_bytes: default_max_body_bytes(),
      cors: CorsConfig::default(),
      log: LogConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: &str) -> anyhow::Result<Self> {
    let config_str = fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file '{}'", path))?;

    let config = Self::from_toml(&config_str)
      .with_context(|| format!("Failed to parse config file '{}'", path))?;

    Ok(config)
  }

  /// Parse and validate configuration from a TOML string
  pub fn from_toml(s: &str) -> anyhow::Result<Self> {
    let config: Config = toml::from_str(s)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> anyhow::Result<()> {
    if self.server_addr.is_empty() {
      bail!("server_addr must not be empty");
    }
    if self.max_body_bytes == 0 {
      bail!("max_body_bytes must be greater than zero");
    }
    self.cors.origin()?;
    Ok(())
  }
}
