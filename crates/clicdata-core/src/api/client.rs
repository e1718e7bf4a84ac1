use super::auth::Credentials;
use super::request::{ApiRequest, ApiResponse};
use super::session::{Session, SessionOptions};
use crate::error::{AppError, ArgumentError};
use crate::utils::error_helpers::convert_request_error;
use reqwest::RequestBuilder;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

/// Dispatches authenticated requests through a single [`Session`].
///
/// Every call takes `&mut self`: a token refresh mutates the session, so one
/// client serves one caller at a time.
#[derive(Debug)]
pub struct ClicDataClient {
    session: Session,
}

impl ClicDataClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn with_credentials(
        credentials: Credentials,
        options: SessionOptions,
    ) -> Result<Self, AppError> {
        Ok(Self::new(Session::new(credentials, options)?))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Session headers with `extra` merged on top; extra keys win on conflict.
    pub fn build_headers(&self, request: &ApiRequest) -> Result<HeaderMap, ArgumentError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(authorization) = self.session.authorization_header() {
            let value = HeaderValue::from_str(&authorization).map_err(|e| {
                ArgumentError::MalformedHeaders(format!("authorization: {}", e))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ArgumentError::MalformedHeaders(format!("'{}': {}", key, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ArgumentError::MalformedHeaders(format!("'{}': {}", key, e)))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    pub fn build_request(&self, request: &ApiRequest) -> Result<RequestBuilder, ArgumentError> {
        let headers = self.build_headers(request)?;
        let url = self.session.endpoint(&request.suffix);

        let mut builder = self
            .session
            .http()
            .request(request.verb.method(), url)
            .headers(headers);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        match (&request.body, request.verb.carries_body()) {
            (Some(body), true) => builder = builder.json(body),
            (Some(_), false) => {
                log::debug!("Dropping body on {} {}", request.verb, request.suffix)
            }
            (None, _) => {}
        }

        Ok(builder)
    }

    /// Send one request and return the response without interpreting it.
    pub async fn call(&mut self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        // Header validation only depends on the request, so bad input fails
        // before the token manager can touch the network.
        self.build_headers(&request)?;
        self.session.ensure_valid().await?;

        let builder = self.build_request(&request)?;
        log::debug!("{} {}", request.verb, request.suffix);

        let endpoint = request.suffix;
        let timeout_secs = self.session.timeout_secs();
        let response = builder
            .send()
            .await
            .map_err(|e| convert_request_error(e, &endpoint, timeout_secs))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| convert_request_error(e, &endpoint, timeout_secs))?;
        log::debug!("{} {} -> {}", status.as_u16(), endpoint, body.len());

        Ok(ApiResponse {
            status,
            headers,
            body,
            endpoint,
        })
    }

    /// Send a request and fail on any non-success status.
    pub async fn call_checked(&mut self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        Ok(self.call(request).await?.error_for_status()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::Verb;
    use serde_json::json;

    fn basic_client() -> ClicDataClient {
        ClicDataClient::with_credentials(
            Credentials::basic("client42", "user", "pass"),
            SessionOptions::default().with_base_url("http://example.test"),
        )
        .expect("client creation failed")
    }

    #[test]
    fn test_build_request_url_and_method() {
        let client = basic_client();
        let request = ApiRequest::get("data/12").param("page", 3);
        let built = client
            .build_request(&request)
            .expect("request should build")
            .build()
            .expect("Failed to build request");

        assert_eq!(built.url().as_str(), "http://example.test/data/12?page=3");
        assert_eq!(built.method(), &Verb::Get.method());
        assert_eq!(
            built.headers().get("accept").unwrap().to_str().unwrap(),
            "application/json"
        );
        assert!(
            built
                .headers()
                .get("authorization")
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("Basic ")
        );
    }

    #[test]
    fn test_extra_headers_override_session_headers() {
        let client = basic_client();
        let request = ApiRequest::get("account")
            .header("Accept", "text/plain")
            .header("x-request-id", "42");
        let headers = client.build_headers(&request).expect("headers should build");

        assert_eq!(headers.get_all("accept").iter().count(), 1);
        assert_eq!(headers.get("accept").unwrap(), "text/plain");
        assert_eq!(headers.get("x-request-id").unwrap(), "42");
        assert!(headers.get("authorization").is_some());
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let client = basic_client();
        let request = ApiRequest::get("account").header("bad header", "x");
        assert!(matches!(
            client.build_headers(&request),
            Err(ArgumentError::MalformedHeaders(_))
        ));
    }

    #[test]
    fn test_body_dropped_for_get_and_sent_for_delete() {
        let client = basic_client();

        let get = ApiRequest::get("data").json(json!({"ignored": true}));
        let built = client.build_request(&get).unwrap().build().unwrap();
        assert!(built.body().is_none());

        let delete = ApiRequest::delete("data/1/row").json(json!({"multiplerows": "all"}));
        let built = client.build_request(&delete).unwrap().build().unwrap();
        let bytes = built.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(bytes).unwrap(),
            json!({"multiplerows": "all"})
        );
    }
}
