//! Error types for the setlist.fm client.
//!
//! # Design
//! Every failure of a dispatch surfaces as an `ApiError` value; nothing
//! panics past the dispatch boundary. The three variants keep the local
//! validation, transport/status and decode cases apart for callers that
//! match on them, while `code()` and `message()` flatten them back into the
//! numeric-code-plus-optional-message shape the remote API's clients expect:
//!
//! | variant           | `code()`                  | `message()`             |
//! |-------------------|---------------------------|-------------------------|
//! | `InvalidEndpoint` | `0`                       | fixed validation text   |
//! | `Http`            | response status, else -1  | transport error, if any |
//! | `Decode`          | response status           | decoder error           |

use thiserror::Error;

/// Message carried by `ApiError::InvalidEndpoint`.
pub const INVALID_ENDPOINT_MESSAGE: &str = "Provided endpoint is not valid";

/// Failure outcome of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The endpoint path could not be turned into a URL below the base
    /// address. No network I/O was attempted.
    #[error("Provided endpoint is not valid")]
    InvalidEndpoint,

    /// The exchange failed: no body, a non-2xx status, or a transport-level
    /// error (connection refused, timeout, cancellation).
    #[error("{}", describe_http(.status, .message))]
    Http {
        status: Option<u16>,
        message: Option<String>,
    },

    /// The server answered 2xx but the body did not match the requested
    /// shape.
    #[error("HTTP {status}: response could not be decoded: {message}")]
    Decode { status: u16, message: String },
}

impl ApiError {
    /// Numeric error code: `0` for local validation failures, the HTTP
    /// status when a response was received, `-1` otherwise.
    pub fn code(&self) -> i32 {
        match self {
            ApiError::InvalidEndpoint => 0,
            ApiError::Http { status, .. } => status.map_or(-1, i32::from),
            ApiError::Decode { status, .. } => i32::from(*status),
        }
    }

    /// Human-readable detail, when one is available.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::InvalidEndpoint => Some(INVALID_ENDPOINT_MESSAGE),
            ApiError::Http { message, .. } => message.as_deref(),
            ApiError::Decode { message, .. } => Some(message),
        }
    }
}

fn describe_http(status: &Option<u16>, message: &Option<String>) -> String {
    match (status, message) {
        (Some(status), Some(message)) => format!("HTTP {status}: {message}"),
        (Some(status), None) => format!("HTTP {status}"),
        (None, Some(message)) => format!("request failed: {message}"),
        (None, None) => "request failed".to_string(),
    }
}

/// Errors raised while assembling a `ClientConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("unsupported language code: {0}")]
    UnknownLanguage(String),

    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_endpoint_has_code_zero_and_fixed_message() {
        let err = ApiError::InvalidEndpoint;
        assert_eq!(err.code(), 0);
        assert_eq!(err.message(), Some("Provided endpoint is not valid"));
        assert_eq!(err.to_string(), "Provided endpoint is not valid");
    }

    #[test]
    fn http_error_without_response_uses_minus_one() {
        let err = ApiError::Http {
            status: None,
            message: Some("connection refused".to_string()),
        };
        assert_eq!(err.code(), -1);
        assert_eq!(err.message(), Some("connection refused"));
        assert_eq!(err.to_string(), "request failed: connection refused");
    }

    #[test]
    fn http_error_with_status_and_no_message() {
        let err = ApiError::Http {
            status: Some(404),
            message: None,
        };
        assert_eq!(err.code(), 404);
        assert!(err.message().is_none());
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn decode_error_keeps_response_status() {
        let err = ApiError::Decode {
            status: 200,
            message: "missing field `name`".to_string(),
        };
        assert_eq!(err.code(), 200);
        assert_eq!(err.message(), Some("missing field `name`"));
    }
}
