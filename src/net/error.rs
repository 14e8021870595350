//! Error types for the request layer.
//!
//! ERROR HANDLING
//! ==============
//! `TransportError` is what the request helper surfaces: the request never
//! produced a response. `ApiError` is what typed endpoint wrappers surface:
//! a transport failure, a non-2xx status, or a body that failed to
//! (de)serialize.

use serde::Deserialize;

/// A request that never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// DNS failure, refused connection, TLS handshake failure.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request was cut off before a response arrived.
    #[error("request aborted: {0}")]
    Aborted(String),

    /// The request could not be built (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// Any other failure reported by the HTTP stack.
    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_builder() {
            Self::InvalidRequest(message)
        } else if err.is_connect() {
            Self::Connect(message)
        } else if err.is_timeout() || err.is_body() {
            Self::Aborted(message)
        } else {
            Self::Other(message)
        }
    }
}

/// Error payload the backend attaches to failed requests.
///
/// Public errors carry `code`/`error`/`tip`; internal failures carry
/// `error`/`eventId` so operators can correlate with server logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: Option<u16>,
    pub error: Option<String>,
    pub tip: Option<String>,
    pub event_id: Option<String>,
}

/// Errors produced by typed endpoint wrappers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend answered with a non-2xx status.
    #[error("{path} returned status {status}{}", code_suffix(.body))]
    Status { path: String, status: u16, body: Option<ErrorBody> },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(serde_json::Error),

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(serde_json::Error),
}

fn code_suffix(body: &Option<ErrorBody>) -> String {
    body.as_ref()
        .and_then(|body| body.error.as_deref())
        .map(|code| format!(" ({code})"))
        .unwrap_or_default()
}

impl ApiError {
    /// Machine-readable error code (`UNAUTHORIZED`, `NOT_FOUND`, ...).
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Status { body: Some(ErrorBody { error: Some(code), .. }), .. } => code,
            Self::Status { .. } => "HTTP_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Encode(_) => "ENCODE_ERROR",
        }
    }

    /// HTTP status, when the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
