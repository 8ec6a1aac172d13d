mod defaults;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ClientError;
use defaults::*;

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub incognitus: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub host: HostConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Backend REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin of the REST API; endpoint paths start with `/api/`.
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

/// Translation loader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Base the `i18n/<code>.json` path is resolved against.
    #[serde(default = "default_i18n_url")]
    pub base_url: String,
    /// Read tables from this directory instead of over HTTP. Empty = HTTP.
    #[serde(default)]
    pub dir: String,
    /// JSON file holding persisted preferences (the stored language).
    #[serde(default = "default_prefs_file")]
    pub prefs_file: String,
    /// Upper bound on startup language detection.
    #[serde(default = "default_detect_timeout")]
    pub detect_timeout_secs: u64,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            base_url: default_i18n_url(),
            dir: String::new(),
            prefs_file: default_prefs_file(),
            detect_timeout_secs: default_detect_timeout(),
        }
    }
}

/// Host container settings used when running outside the container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Launch payload. Empty = not embedded.
    #[serde(default)]
    pub init_data: String,
    #[serde(default = "default_platform")]
    pub platform: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            init_data: String::new(),
            platform: default_platform(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, ClientError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ClientError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
