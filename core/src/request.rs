//! Turns an `Endpoint` plus the client configuration into an `HttpRequest`.
//!
//! # Design
//! The builder is pure: no I/O, no clock, no randomness. The same endpoint
//! and configuration always produce the same request, which is what the
//! test vectors in `test-vectors/` pin down.
//!
//! Query escaping happens in two passes. Names and values are first
//! percent-encoded, leaving RFC 3986 unreserved characters and `+` alone.
//! The finished query string then has every `+` replaced with `%2B`, because
//! the server decodes a bare `+` as a space.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const ACCEPT_HEADER: &str = "Accept";
pub const LANGUAGE_HEADER: &str = "Accept-Language";

const JSON: &str = "application/json";

const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'+');

/// Build the GET request for `endpoint`.
///
/// Fails with `ApiError::InvalidEndpoint` when the path does not resolve to
/// a URL below the configured base (unparseable, absolute, an empty or dot
/// segment, a leading `/`, or its own query or fragment).
pub fn build_request(endpoint: &Endpoint, config: &ClientConfig) -> Result<HttpRequest, ApiError> {
    let mut url = resolve_path(config.base_url(), endpoint.path())?;

    let query = encode_query(endpoint);
    if !query.is_empty() {
        url.set_query(Some(&query));
    }

    debug!(url = %url, language = %config.language(), "built request");

    Ok(HttpRequest {
        method: HttpMethod::Get,
        url: url.into(),
        headers: vec![
            (API_KEY_HEADER.to_string(), config.api_key().to_string()),
            (ACCEPT_HEADER.to_string(), JSON.to_string()),
            (LANGUAGE_HEADER.to_string(), config.language().code().to_string()),
        ],
    })
}

/// Encoded query string for the supplied (non-empty) parameters, without
/// the leading `?`. Empty when nothing is supplied.
pub fn encode_query(endpoint: &Endpoint) -> String {
    let query = endpoint
        .supplied_parameters()
        .map(|(name, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(name, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    query.replace('+', "%2B")
}

fn resolve_path(base: &Url, path: &str) -> Result<Url, ApiError> {
    if let Some(segment) = path.split('/').find(|s| is_unaddressable_segment(s)) {
        debug!(path, segment, "endpoint path has an empty or dot segment");
        return Err(ApiError::InvalidEndpoint);
    }

    let url = base.join(path).map_err(|e| {
        debug!(path, error = %e, "endpoint path rejected");
        ApiError::InvalidEndpoint
    })?;

    let below_base = url.as_str().starts_with(base.as_str());
    if !below_base || url.query().is_some() || url.fragment().is_some() {
        debug!(path, "endpoint path does not resolve below the base URL");
        return Err(ApiError::InvalidEndpoint);
    }
    Ok(url)
}

/// Segments URL resolution would collapse: empty, `.` and `..`, with `%2e`
/// read as a dot.
fn is_unaddressable_segment(segment: &str) -> bool {
    let dots = segment.to_ascii_lowercase().replace("%2e", ".");
    dots.is_empty() || dots == "." || dots == ".."
}
