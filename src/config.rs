//! Application Configuration
//!
//! Loaded from a TOML file. Every field has a default, so a missing file or
//! an empty one yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cache::DEFAULT_KEY_PREFIX;
use crate::routes::DEFAULT_LOGIN_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file; `:memory:` for a throwaway database
    pub database_path: PathBuf,
    /// Directory for rolling log files; logging to file is off when unset
    pub log_dir: Option<PathBuf>,
    /// `daily`, `hourly`, `minutely` or `never`
    pub log_rotation: String,
    pub app_name: String,
    /// Where anonymous requests are sent
    pub login_url: String,
    pub ordering: OrderingConfig,
    pub drafts: DraftConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("tasks.db"),
            log_dir: None,
            log_rotation: "daily".to_string(),
            app_name: "TaskList".to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            ordering: OrderingConfig::default(),
            drafts: DraftConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    /// Renumber the owner's tasks to 0..n-1 after every reorder
    pub repair_after_reorder: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    pub enabled: bool,
    pub key_prefix: String,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// Load configuration from `path`
///
/// Returns `Ok(AppConfig::default())` if the file does not exist.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        log::debug!("Config not found at {}; using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}
