//! Configuration service: editing config.toml and turning it into a connection

use crate::AppError;
use crate::api::auth::{AuthMethod, Credentials};
use crate::api::client::ClicDataClient;
use crate::api::session::{DEFAULT_BASE_URL, SessionOptions};
use crate::error::ArgumentError;
use crate::storage::config::Config;
use crate::storage::credentials::{get_client_secret, get_password};
use crate::utils::validation::validate_url;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_AUTH_METHOD: &str = "client_credentials";

/// Keys accepted by [`ConfigService::set_field`]
pub const CONFIG_KEYS: [&str; 5] = ["url", "auth_method", "client_id", "username", "timeout_seconds"];

/// Configuration service for managing application configuration
pub struct ConfigService {
    config: Config,
}

impl ConfigService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set one config key from its command-line text, validating the value first
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        match key {
            "url" => {
                validate_url(value)?;
                self.config.url = Some(value.to_string());
            }
            "auth_method" => {
                let method: AuthMethod = value.parse()?;
                self.config.auth_method = Some(method.to_string());
            }
            "client_id" => self.config.client_id = Some(value.to_string()),
            "username" => self.config.username = Some(value.to_string()),
            "timeout_seconds" => {
                let seconds = value.parse::<u64>().map_err(|_| ArgumentError::InvalidValue {
                    field: key.to_string(),
                    reason: format!("'{}' is not a whole number of seconds", value),
                })?;
                self.config.timeout_seconds = Some(seconds);
            }
            _ => {
                return Err(ArgumentError::InvalidValue {
                    field: "key".to_string(),
                    reason: format!("'{}' is not one of {}", key, CONFIG_KEYS.join(", ")),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Effective values, with environment fallbacks applied. Secrets are reported
    /// only as present or absent.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let or_unset = |v: Option<String>| v.unwrap_or_else(|| "(not set)".to_string());
        let presence = |v: Option<String>| if v.is_some() { "(set)" } else { "(not set)" }.to_string();
        vec![
            (
                "url",
                self.config.get_url().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ),
            (
                "auth_method",
                self.config
                    .get_auth_method()
                    .unwrap_or_else(|| DEFAULT_AUTH_METHOD.to_string()),
            ),
            ("client_id", or_unset(self.config.get_client_id())),
            ("username", or_unset(self.config.get_username())),
            (
                "timeout_seconds",
                self.config
                    .timeout_seconds
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "(none)".to_string()),
            ),
            ("client_secret", presence(get_client_secret())),
            ("password", presence(get_password())),
        ]
    }

    pub fn save_config(&self, path: Option<PathBuf>) -> Result<(), AppError> {
        self.config.save(path).map_err(|e| e.into())
    }

    /// Connection settings seeded from config.toml and the environment
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            url: self.config.get_url(),
            auth_method: self.config.get_auth_method(),
            client_id: self.config.get_client_id(),
            client_secret: get_client_secret(),
            username: self.config.get_username(),
            password: get_password(),
            timeout_seconds: self.config.timeout_seconds,
        }
    }
}

/// Loose connection parameters, before they are checked and turned into a client.
///
/// Fields are public so command-line flags can override what the config provided.
#[derive(Clone, Default, PartialEq)]
pub struct ConnectionSettings {
    pub url: Option<String>,
    pub auth_method: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("url", &self.url)
            .field("auth_method", &self.auth_method)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ConnectionSettings {
    pub fn auth_method(&self) -> &str {
        self.auth_method.as_deref().unwrap_or(DEFAULT_AUTH_METHOD)
    }

    pub fn credentials(&self) -> Result<Credentials, AppError> {
        Ok(Credentials::from_params(
            self.auth_method(),
            self.client_id.clone(),
            self.client_secret.clone(),
            self.username.clone(),
            self.password.clone(),
        )?)
    }

    pub fn session_options(&self) -> SessionOptions {
        let mut options = SessionOptions::default();
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            options = options.with_base_url(url);
        }
        if let Some(seconds) = self.timeout_seconds.filter(|s| *s > 0) {
            options = options.with_timeout(Duration::from_secs(seconds));
        }
        options
    }

    /// Build a client. No network call happens until the first request.
    pub fn connect(&self) -> Result<ClicDataClient, AppError> {
        ClicDataClient::with_credentials(self.credentials()?, self.session_options())
    }
}
