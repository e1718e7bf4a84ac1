//! Input validation and sanitization utilities
//!
//! Everything here runs before a request is built, so bad input never reaches the network.

use crate::error::ArgumentError;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(ArgumentError::MissingValue {
            field: "url".to_string(),
        }
        .into());
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ArgumentError::InvalidValue {
            field: "url".to_string(),
            reason: format!("'{}' must start with http:// or https://", url),
        }
        .into());
    }

    Ok(())
}

/// Reject empty or whitespace-only values for a named field
pub fn require_non_empty(field: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(ArgumentError::MissingValue {
            field: field.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Split a `key=value` pair as given on the command line
pub fn parse_key_value(field: &str, pair: &str) -> crate::Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ArgumentError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not in key=value form", pair),
        }
        .into()),
    }
}
