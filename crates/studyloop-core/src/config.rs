//! TOML-based application configuration.
//!
//! Stored at `~/.config/studyloop/config.toml`. Covers the review API
//! endpoint and the study defaults the CLI falls back to when flags are
//! omitted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::store::data_dir;

/// Review API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional bearer token.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Study defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    #[serde(default = "default_max_cards")]
    pub default_max_cards: u32,
    #[serde(default = "default_true")]
    pub prefetch_previews: bool,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            default_max_cards: default_max_cards(),
            prefetch_previews: default_true(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyloop/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub study: StudyConfig,
}

fn default_base_url() -> String {
    "http://localhost:8747/api".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_max_cards() -> u32 {
    20
}
fn default_true() -> bool {
    true
}

impl Config {
    /// Path of the config file under the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/studyloop"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the config, falling back to defaults when the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })
            }
        };
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}
