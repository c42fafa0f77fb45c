//! HTTP exchange types shared by the request builder, the dispatcher and
//! transports.
//!
//! # Design
//! Requests and responses are plain data. The builder produces an
//! `HttpRequest` without touching the network; a `Transport` turns it into
//! either an `HttpResponse` or a `TransportError`. Keeping the exchange as
//! data lets tests substitute a stub transport, and lets callers that want
//! to run the I/O themselves use `build_request` / `parse_response`
//! directly.

use bytes::Bytes;

/// HTTP method for a request. The API is read-only, so GET is the only
/// method the client ever emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// A fully prepared request: absolute URL with query string, plus headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first header named `name` (ASCII case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A response as received by a transport.
///
/// `body` is `None` when the transport got a status line but no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpResponse {
    /// A response with a JSON body and no headers. Mostly useful for stubs.
    pub fn json(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A transport-level failure. The transport may still have received a
/// response (e.g. the body stream broke after the status line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
    pub response: Option<HttpResponse>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(message: impl Into<String>, response: HttpResponse) -> Self {
        Self {
            message: message.into(),
            response: Some(response),
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}
