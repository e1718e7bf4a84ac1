//! Session state and the token lifecycle.
//!
//! A [`Session`] owns one set of [`Credentials`] and the current [`Token`].
//! [`Session::ensure_valid`] is the only place a token is acquired or refreshed.

use super::auth::{Credentials, basic_token};
use super::models::TokenResponse;
use crate::error::{AppError, AuthError};
use crate::utils::error_helpers::convert_request_error;
use crate::utils::validation::validate_url;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.clicdata.com/";
const TOKEN_SUFFIX: &str = "oauth20/token";
const USER_AGENT: &str = concat!("clicdata-core/", env!("CARGO_PKG_VERSION"));

/// Connection settings that are not credentials.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub base_url: String,
    /// Applied to every outbound call when set. No timeout otherwise.
    pub timeout: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl SessionOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub access_token: String,
    /// `None` for static basic credentials, which never expire.
    pub expire_time: Option<DateTime<Utc>>,
}

impl Token {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expire_time {
            Some(expire_time) => now >= expire_time,
            None => false,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    http: Client,
    base_url: String,
    timeout: Option<Duration>,
    credentials: Credentials,
    token: Option<Token>,
}

impl Session {
    /// Build a session. Performs no network call; client-credentials tokens
    /// are fetched lazily by [`Session::ensure_valid`].
    pub fn new(credentials: Credentials, options: SessionOptions) -> Result<Self, AppError> {
        validate_url(&options.base_url)?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| convert_request_error(e, "client_init", 0))?;

        let token = match &credentials {
            Credentials::Basic {
                client_id,
                username,
                password,
            } => Some(Token {
                access_token: basic_token(client_id, username, password),
                expire_time: None,
            }),
            Credentials::ClientCredentials { .. } => None,
        };

        Ok(Session {
            http,
            base_url: format!("{}/", options.base_url.trim_end_matches('/')),
            timeout: options.timeout,
            credentials,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn timeout_secs(&self) -> u64 {
        self.timeout.map(|t| t.as_secs()).unwrap_or(0)
    }

    /// Absolute URL for a path suffix such as `data/12/versions`.
    pub fn endpoint(&self, suffix: &str) -> String {
        format!("{}{}", self.base_url, suffix.trim_start_matches('/'))
    }

    /// Value of the Authorization header, if a token is held.
    pub fn authorization_header(&self) -> Option<String> {
        let token = self.token.as_ref()?;
        let scheme = match self.credentials {
            Credentials::ClientCredentials { .. } => "Bearer",
            Credentials::Basic { .. } => "Basic",
        };
        Some(format!("{} {}", scheme, token.access_token))
    }

    pub fn needs_refresh(&self) -> bool {
        match (&self.credentials, &self.token) {
            (Credentials::Basic { .. }, _) => false,
            (Credentials::ClientCredentials { .. }, None) => true,
            (Credentials::ClientCredentials { .. }, Some(token)) => token.is_expired_at(Utc::now()),
        }
    }

    /// Make sure the held token is usable right now, fetching a new one if needed.
    ///
    /// On failure the previous token (possibly none) is left in place.
    pub async fn ensure_valid(&mut self) -> Result<(), AppError> {
        if !self.needs_refresh() {
            return Ok(());
        }

        let Credentials::ClientCredentials {
            client_id,
            client_secret,
        } = &self.credentials
        else {
            return Ok(());
        };

        log::debug!("Requesting access token for client {}", client_id);
        let token = self.fetch_token(client_id, client_secret).await?;
        log::debug!("Access token valid until {:?}", token.expire_time);
        self.token = Some(token);
        Ok(())
    }

    async fn fetch_token(&self, client_id: &str, client_secret: &str) -> Result<Token, AppError> {
        let endpoint = self.endpoint(TOKEN_SUFFIX);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];

        let response = self
            .http
            .post(&endpoint)
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| convert_request_error(e, TOKEN_SUFFIX, self.timeout_secs()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| convert_request_error(e, TOKEN_SUFFIX, self.timeout_secs()))?;

        if !status.is_success() {
            return Err(AuthError::TokenRequestFailed {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::TokenRequestFailed {
                status: status.as_u16(),
                message: format!("Unreadable token response: {}", e),
            })?;

        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::MissingField {
                field: "access_token".to_string(),
            })?;
        let expires_in = parsed.expires_in.ok_or_else(|| AuthError::MissingField {
            field: "expires_in".to_string(),
        })?;
        let lifetime = TimeDelta::try_seconds(expires_in).ok_or_else(|| AuthError::MissingField {
            field: "expires_in".to_string(),
        })?;

        Ok(Token {
            access_token,
            expire_time: Some(Utc::now() + lifetime),
        })
    }
}
