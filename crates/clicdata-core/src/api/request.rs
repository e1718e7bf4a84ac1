//! Request descriptors and raw responses exchanged with the dispatcher.

use crate::error::{ApiError, ArgumentError};
use crate::utils::error_helpers::convert_json_error;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }

    /// Whether a JSON body is sent with this verb.
    pub fn carries_body(&self) -> bool {
        !matches!(self, Verb::Get)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

impl FromStr for Verb {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Verb::Get),
            "post" => Ok(Verb::Post),
            "put" => Ok(Verb::Put),
            "delete" => Ok(Verb::Delete),
            _ => Err(ArgumentError::InvalidVerb(s.to_string())),
        }
    }
}

/// Everything needed to make one API call, relative to the session's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub suffix: String,
    pub verb: Verb,
    pub params: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(verb: Verb, suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            verb,
            params: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(suffix: impl Into<String>) -> Self {
        Self::new(Verb::Get, suffix)
    }

    pub fn post(suffix: impl Into<String>) -> Self {
        Self::new(Verb::Post, suffix)
    }

    pub fn put(suffix: impl Into<String>) -> Self {
        Self::new(Verb::Put, suffix)
    }

    pub fn delete(suffix: impl Into<String>) -> Self {
        Self::new(Verb::Delete, suffix)
    }

    /// Build a request from untyped parts, as received from a command line or script.
    ///
    /// `params` and `headers` must be flat JSON objects whose values are scalars.
    pub fn from_parts(
        verb: &str,
        suffix: &str,
        params: Option<&Value>,
        headers: Option<&Value>,
        body: Option<Value>,
    ) -> Result<Self, ArgumentError> {
        let mut request = ApiRequest::new(verb.parse()?, suffix);
        if let Some(params) = params {
            request.params = flatten(params).map_err(ArgumentError::MalformedParams)?;
        }
        if let Some(headers) = headers {
            request.headers = flatten(headers).map_err(ArgumentError::MalformedHeaders)?;
        }
        request.body = body;
        Ok(request)
    }

    /// Set a query parameter, replacing any previous value for the key.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

fn flatten(value: &Value) -> Result<BTreeMap<String, String>, String> {
    let Value::Object(map) = value else {
        return Err(format!("expected a key/value mapping, got {}", value));
    };

    let mut flat = BTreeMap::new();
    for (key, value) in map {
        let rendered = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                return Err(format!("value for '{}' must be a string, number or boolean", key));
            }
        };
        flat.insert(key.clone(), rendered);
    }
    Ok(flat)
}

/// A response exactly as the server sent it.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
    /// Suffix of the request that produced this response, for error context.
    pub endpoint: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| convert_json_error(e, &self.endpoint))
    }

    /// Turn a non-success status into the matching [`ApiError`].
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status.as_u16();
        match status {
            401 | 403 => Err(ApiError::Unauthorized {
                status,
                endpoint: self.endpoint,
                server_message: self.body,
            }),
            _ => Err(ApiError::Http {
                status,
                endpoint: self.endpoint,
                message: self.body,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_string(),
            endpoint: "data/7".to_string(),
        }
    }

    #[test]
    fn test_verb_parsing() {
        assert_eq!("GET".parse::<Verb>().unwrap(), Verb::Get);
        assert_eq!("delete".parse::<Verb>().unwrap(), Verb::Delete);
        assert!(matches!(
            "patch".parse::<Verb>(),
            Err(ArgumentError::InvalidVerb(v)) if v == "patch"
        ));
    }

    #[test]
    fn test_builder_params_are_unique() {
        let request = ApiRequest::get("data/1").param("page", 1).param("page", 2);
        assert_eq!(request.params.len(), 1);
        assert_eq!(request.params.get("page"), Some(&"2".to_string()));
    }

    #[test]
    fn test_from_parts_flattens_scalars() {
        let request = ApiRequest::from_parts(
            "get",
            "dashboard",
            Some(&json!({"includethumbnail": false, "name": "Sales", "limit": 5})),
            Some(&json!({"x-trace": "abc"})),
            None,
        )
        .unwrap();
        assert_eq!(request.verb, Verb::Get);
        assert_eq!(request.params.get("includethumbnail"), Some(&"false".to_string()));
        assert_eq!(request.params.get("limit"), Some(&"5".to_string()));
        assert_eq!(request.headers.get("x-trace"), Some(&"abc".to_string()));
    }

    #[test]
    fn test_from_parts_rejects_nested_params() {
        let result = ApiRequest::from_parts(
            "get",
            "data",
            Some(&json!({"filter": {"name": "x"}})),
            None,
            None,
        );
        assert!(matches!(result, Err(ArgumentError::MalformedParams(_))));

        let result = ApiRequest::from_parts("get", "data", Some(&json!(["page", 1])), None, None);
        assert!(matches!(result, Err(ArgumentError::MalformedParams(_))));

        let result = ApiRequest::from_parts("get", "data", None, Some(&json!("accept")), None);
        assert!(matches!(result, Err(ArgumentError::MalformedHeaders(_))));
    }

    #[test]
    fn test_from_parts_rejects_unknown_verb() {
        let result = ApiRequest::from_parts("patch", "data", None, None, None);
        assert!(matches!(result, Err(ArgumentError::InvalidVerb(_))));
    }

    #[test]
    fn test_error_for_status() {
        assert!(response(200, "ok").error_for_status().is_ok());

        match response(401, "bad token").error_for_status() {
            Err(ApiError::Unauthorized { status, .. }) => assert_eq!(status, 401),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }

        match response(404, "no such data").error_for_status() {
            Err(ApiError::Http {
                status,
                endpoint,
                message,
            }) => {
                assert_eq!(status, 404);
                assert_eq!(endpoint, "data/7");
                assert_eq!(message, "no such data");
            }
            other => panic!("Expected Http, got {:?}", other),
        }
    }

    #[test]
    fn test_json_decoding() {
        let value: Value = response(200, r#"{"a": 1}"#).json().unwrap();
        assert_eq!(value, json!({"a": 1}));
        assert!(matches!(
            response(200, "not json").json::<Value>(),
            Err(ApiError::Decode { .. })
        ));
    }
}
