//! Credential kinds accepted by the ClicData API and their Authorization encodings.

use crate::error::AuthError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::str::FromStr;

/// How a session authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    ClientCredentials,
    Basic,
    AuthorizationCode,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::ClientCredentials => "client_credentials",
            AuthMethod::Basic => "basic",
            AuthMethod::AuthorizationCode => "authorization_code",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client_credentials" => Ok(AuthMethod::ClientCredentials),
            "basic" => Ok(AuthMethod::Basic),
            "authorization_code" => Ok(AuthMethod::AuthorizationCode),
            other => Err(AuthError::UnknownMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Credentials held by a session. Immutable once built.
///
/// There is no authorization-code variant: that flow is rejected while the
/// credentials are being assembled, so a session can never hold one.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
    Basic {
        client_id: String,
        username: String,
        password: String,
    },
}

impl Credentials {
    pub fn client_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Credentials::ClientCredentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn basic(
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Credentials::Basic {
            client_id: client_id.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Assemble credentials from loosely typed connection parameters, such as
    /// values read from a config file and the environment.
    pub fn from_params(
        auth_method: &str,
        client_id: Option<String>,
        client_secret: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, AuthError> {
        let method: AuthMethod = auth_method.parse()?;
        let require = |field: &str, value: Option<String>| {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AuthError::MissingCredential {
                    field: field.to_string(),
                    method: method.to_string(),
                })
        };

        match method {
            AuthMethod::ClientCredentials => Ok(Credentials::client_credentials(
                require("client_id", client_id)?,
                require("client_secret", client_secret)?,
            )),
            AuthMethod::Basic => Ok(Credentials::basic(
                require("client_id", client_id)?,
                require("username", username)?,
                require("password", password)?,
            )),
            AuthMethod::AuthorizationCode => Err(AuthError::UnsupportedMethod {
                method: method.to_string(),
            }),
        }
    }

    pub fn method(&self) -> AuthMethod {
        match self {
            Credentials::ClientCredentials { .. } => AuthMethod::ClientCredentials,
            Credentials::Basic { .. } => AuthMethod::Basic,
        }
    }

    pub fn client_id(&self) -> &str {
        match self {
            Credentials::ClientCredentials { client_id, .. } | Credentials::Basic { client_id, .. } => {
                client_id
            }
        }
    }
}

// Secrets stay out of debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ClientCredentials { client_id, .. } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .field("client_secret", &"***")
                .finish(),
            Credentials::Basic {
                client_id,
                username,
                ..
            } => f
                .debug_struct("Basic")
                .field("client_id", client_id)
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// ClicData's basic scheme: base64(client_id + base64(username:password)).
///
/// The inner credential is encoded twice. This is what the service accepts,
/// not RFC 7617.
pub fn basic_token(client_id: &str, username: &str, password: &str) -> String {
    let inner = STANDARD.encode(format!("{}:{}", username, password));
    STANDARD.encode(format!("{}{}", client_id, inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_method_parsing() {
        assert_eq!(
            "client_credentials".parse::<AuthMethod>().unwrap(),
            AuthMethod::ClientCredentials
        );
        assert_eq!("Basic".parse::<AuthMethod>().unwrap(), AuthMethod::Basic);
        assert!(matches!(
            "oauth1".parse::<AuthMethod>(),
            Err(AuthError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn test_from_params_rejects_authorization_code() {
        let result = Credentials::from_params(
            "authorization_code",
            Some("id".to_string()),
            Some("secret".to_string()),
            None,
            None,
        );
        assert!(matches!(result, Err(AuthError::UnsupportedMethod { .. })));
    }

    #[test]
    fn test_from_params_requires_fields() {
        let result = Credentials::from_params("basic", Some("id".to_string()), None, None, None);
        match result {
            Err(AuthError::MissingCredential { field, method }) => {
                assert_eq!(field, "username");
                assert_eq!(method, "basic");
            }
            other => panic!("Expected MissingCredential, got {:?}", other),
        }

        let result = Credentials::from_params(
            "client_credentials",
            Some("id".to_string()),
            Some(String::new()),
            None,
            None,
        );
        assert!(matches!(result, Err(AuthError::MissingCredential { .. })));
    }

    #[test]
    fn test_from_params_builds_client_credentials() {
        let credentials = Credentials::from_params(
            "client_credentials",
            Some("id".to_string()),
            Some("secret".to_string()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(credentials.method(), AuthMethod::ClientCredentials);
        assert_eq!(credentials.client_id(), "id");
    }

    #[test]
    fn test_basic_token_double_encoding() {
        // base64("user:pass") == "dXNlcjpwYXNz"
        let expected = STANDARD.encode("client42dXNlcjpwYXNz");
        assert_eq!(basic_token("client42", "user", "pass"), expected);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let credentials = Credentials::basic("id", "alice", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
