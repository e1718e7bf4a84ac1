//! Configuration management
//!
//! Connection settings stored in `~/.config/clicdata/config.toml`, each with an
//! environment fallback. Priority: CLI argument > config.toml > environment variable.
//! Secrets are never stored here; see [`super::credentials`].

use super::Result;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const URL_ENV: &str = "CLICDATA_URL";
pub const AUTH_METHOD_ENV: &str = "CLICDATA_AUTH_METHOD";
pub const CLIENT_ID_ENV: &str = "CLICDATA_CLIENT_ID";
pub const USERNAME_ENV: &str = "CLICDATA_USERNAME";

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// API base URL, defaults to the public ClicData endpoint
    pub url: Option<String>,
    /// `client_credentials` or `basic`
    pub auth_method: Option<String>,
    pub client_id: Option<String>,
    /// Only used for basic authentication
    pub username: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(home_dir.join(".config").join("clicdata").join("config.toml"))
    }

    pub fn get_url(&self) -> Option<String> {
        self.url.clone().or_else(|| env_value(URL_ENV))
    }

    pub fn get_auth_method(&self) -> Option<String> {
        self.auth_method.clone().or_else(|| env_value(AUTH_METHOD_ENV))
    }

    pub fn get_client_id(&self) -> Option<String> {
        self.client_id.clone().or_else(|| env_value(CLIENT_ID_ENV))
    }

    pub fn get_username(&self) -> Option<String> {
        self.username.clone().or_else(|| env_value(USERNAME_ENV))
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
