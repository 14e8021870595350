//! Credentialed request helper for the tutoring backend.
//!
//! ARCHITECTURE
//! ============
//! `ApiClient` turns a path plus caller options into an absolute
//! `HttpRequest` and hands it to a `Transport`. Production uses
//! `ReqwestTransport`; tests inject a mock. Every request forwards
//! credentials (the session cookie), and callers cannot opt out.
//!
//! ERROR HANDLING
//! ==============
//! A non-2xx status is not an error here: the raw response is returned and
//! callers inspect `ok()`/`status()`. A transport failure is logged once and
//! returned to the caller unchanged. There is no retry and no timeout.

use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ErrorBody, TransportError};
use crate::config::ClientConfig;

// =============================================================================
// REQUEST
// =============================================================================

/// Cookie policy attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    /// Send and store cookies, including on cross-origin requests.
    Include,
    /// Never send or store cookies.
    Omit,
}

/// Caller-supplied request options, merged over the client defaults.
///
/// There is no credentials field: [`ApiClient`] always includes them.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body and set `Content-Type` accordingly.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body))
    }
}

/// A fully resolved request, ready for a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub credentials: Credentials,
}

// =============================================================================
// RESPONSE
// =============================================================================

/// A raw HTTP response with its body already read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self { status, headers, body }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// True for any 2xx status.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Executes resolved requests. Implemented by [`ReqwestTransport`] and by test mocks.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport with a persistent cookie jar.
pub struct ReqwestTransport {
    with_cookies: reqwest::Client,
    without_cookies: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new() -> Result<Self, TransportError> {
        let with_cookies = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        let without_cookies = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { with_cookies, without_cookies })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = match request.credentials {
            Credentials::Include => &self.with_cookies,
            Credentials::Omit => &self.without_cookies,
        };
        let mut builder = client.request(request.method, &request.url).headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse::new(status, headers, body))
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Request helper bound to a backend base URL.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self { base_url: base_url.into(), transport }
    }

    /// Build a client for `config.base_url` on top of [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::new(config.base_url.clone(), Arc::new(transport)))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute target for `path`: the base URL followed by the path, verbatim.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Resolve `path` and `options` into a request.
    ///
    /// Caller headers replace default headers of the same name. Credentials
    /// are always [`Credentials::Include`].
    #[must_use]
    pub fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = default_headers();
        headers.extend(options.headers);
        HttpRequest {
            method: options.method.unwrap_or(Method::GET),
            url: self.url(path),
            headers,
            body: options.body,
            credentials: Credentials::Include,
        }
    }

    /// Send a credentialed request and return the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns the transport's error, unchanged, when no response was received.
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> Result<HttpResponse, TransportError> {
        let request = self.build_request(path, options);
        let method = request.method.clone();
        let url = request.url.clone();
        match self.transport.execute(request).await {
            Ok(response) => {
                tracing::debug!(%method, %url, status = response.status().as_u16(), "fetch completed");
                Ok(response)
            }
            Err(e) => {
                tracing::error!(error = %e, %method, %url, "fetch error");
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Typed helpers used by endpoint wrappers
    // -------------------------------------------------------------------------

    /// Send a request and require a 2xx status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] or [`ApiError::Status`].
    pub async fn send(&self, path: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
        let response = self.fetch(path, options).await?;
        if response.ok() {
            return Ok(response);
        }
        let body = response.json::<ErrorBody>().ok();
        Err(ApiError::Status { path: path.to_owned(), status: response.status().as_u16(), body })
    }

    /// `GET` `path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or decode failure.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(path, RequestOptions::new()).await?;
        response.json().map_err(ApiError::Decode)
    }

    /// Send `body` as JSON with `method` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on encode failure, transport failure, non-2xx status, or decode failure.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::new().method(method).json(body).map_err(ApiError::Encode)?;
        let response = self.send(path, options).await?;
        response.json().map_err(ApiError::Decode)
    }

    /// Send an optional JSON body with `method`, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns an error on encode failure, transport failure, or non-2xx status.
    pub async fn send_unit<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut options = RequestOptions::new().method(method);
        if let Some(body) = body {
            options = options.json(body).map_err(ApiError::Encode)?;
        }
        self.send(path, options).await?;
        Ok(())
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    pub const TEST_BASE_URL: &str = "http://tutorat.test";

    /// Transport that replays queued results and records every request.
    #[derive(Default)]
    pub struct MockTransport {
        results: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn new(results: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self { results: Mutex::new(results.into()), requests: Mutex::new(Vec::new()) })
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last_request(&self) -> HttpRequest {
            self.requests().pop().expect("no request recorded")
        }
    }

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("no mock response queued".to_owned())))
        }
    }

    pub fn response(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(StatusCode::from_u16(status).unwrap(), HeaderMap::new(), body.as_bytes().to_vec()))
    }

    pub fn json_response(status: u16, body: &serde_json::Value) -> Result<HttpResponse, TransportError> {
        response(status, &body.to_string())
    }

    pub fn client_with(transport: &Arc<MockTransport>) -> ApiClient {
        ApiClient::new(TEST_BASE_URL, transport.clone())
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
