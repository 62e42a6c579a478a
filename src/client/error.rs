//! Client error types
//!
//! Normalizes everything that can go wrong talking to the backend into
//! three families: server-reported errors, connectivity failures, and
//! malformed responses.

use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by [`ApiClient`](super::ApiClient) calls
#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-2xx response; `detail` is shown to the user verbatim
    #[error("{detail}")]
    Http { status: u16, detail: String },

    /// The server could not be reached
    #[error("Unable to reach the server. Check your connection and try again.")]
    Network(#[source] reqwest::Error),

    /// The request was aborted by the client-side timeout
    #[error("The server took too long to respond. Check your connection and try again.")]
    Timeout,

    /// A 2xx response whose body did not match the expected shape
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    Request(String),
}

impl ClientError {
    /// Classify a transport-level failure from reqwest
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if err.is_builder() {
            ClientError::Request(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }

    /// Build an HTTP error from a status code and raw response body
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        ClientError::Http {
            status,
            detail: error_detail(status, body),
        }
    }

    /// HTTP status, for server-reported errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The bearer token was rejected; callers should log the user out
    /// rather than display the error.
    pub fn is_auth_failure(&self) -> bool {
        self.status() == Some(401)
    }

    /// Connectivity failure as opposed to a server-reported error
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Extract a human-readable message from an error response body.
///
/// Accepts `{"detail": "..."}`, validation lists of the form
/// `{"detail": [{"msg": "..."}, ...]}`, and `{"message": "..."}`. Anything
/// else falls back to the status reason phrase.
pub(crate) fn error_detail(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail.and_then(detail_text).or(b.message))
        .filter(|s| !s.trim().is_empty());

    parsed.unwrap_or_else(|| status_text(status))
}

fn detail_text(detail: serde_json::Value) -> Option<String> {
    match detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(s) => Some(s.clone()),
                    other => other.get("msg").and_then(|m| m.as_str()).map(str::to_string),
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

fn status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let err = ClientError::from_response(404, r#"{"detail":"Not found"}"#);
        assert_eq!(err.to_string(), "Not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn test_validation_list() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required"},{"msg":"too short"}]}"#;
        assert_eq!(error_detail(422, body), "field required; too short");
    }

    #[test]
    fn test_message_field() {
        assert_eq!(error_detail(400, r#"{"message":"Bad things"}"#), "Bad things");
    }

    #[test]
    fn test_fallback_to_status_text() {
        assert_eq!(error_detail(502, "<html>bad gateway</html>"), "Bad Gateway");
        assert_eq!(error_detail(500, r#"{"detail":""}"#), "Internal Server Error");
        assert_eq!(error_detail(404, r#"{"detail":{"code":1}}"#), "Not Found");
        assert_eq!(error_detail(599, ""), "HTTP 599");
    }

    #[test]
    fn test_auth_failure() {
        let err = ClientError::from_response(401, r#"{"detail":"Could not validate credentials"}"#);
        assert!(err.is_auth_failure());
        assert!(!err.is_connectivity());
        assert!(ClientError::Timeout.is_connectivity());
    }
}
