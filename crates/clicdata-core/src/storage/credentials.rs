//! Secret lookup
//!
//! Client secrets and passwords are read from the environment only and never
//! written to the config file.

use std::env;

pub const CLIENT_SECRET_ENV: &str = "CLICDATA_CLIENT_SECRET";
pub const PASSWORD_ENV: &str = "CLICDATA_PASSWORD";

/// Get the client secret from CLICDATA_CLIENT_SECRET, if set and non-empty
pub fn get_client_secret() -> Option<String> {
    env::var(CLIENT_SECRET_ENV).ok().filter(|k| !k.is_empty())
}

/// Get the basic-auth password from CLICDATA_PASSWORD, if set and non-empty
pub fn get_password() -> Option<String> {
    env::var(PASSWORD_ENV).ok().filter(|k| !k.is_empty())
}
