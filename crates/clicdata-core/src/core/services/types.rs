use crate::error::ValidationError;
use serde::Serialize;
use std::str::FromStr;

/// Filters for the data set listing. Flags are only sent when set.
#[derive(Debug, Clone, Default)]
pub struct DataFilter {
    pub name: Option<String>,
    pub unique_key_available: bool,
    pub refresh: bool,
}

impl DataFilter {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            params.push(("name", name.to_string()));
        }
        if self.unique_key_available {
            params.push(("uniquekeyavailable", "true".to_string()));
        }
        if self.refresh {
            params.push(("refresh", "true".to_string()));
        }
        params
    }
}

/// How dashboard thumbnails and snapshots are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Base64,
    Image,
}

impl FromStr for ImageFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(ImageFormat::Base64),
            "image" => Ok(ImageFormat::Image),
            _ => Err(ValidationError::InvalidImageFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutput {
    Base64(String),
    Image(Vec<u8>),
}

/// Outcome of creating a data set and filling it in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAndAppendResult {
    pub rec_id: u32,
    pub status: String,
}
