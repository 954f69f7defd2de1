//! Response normalization.
//!
//! Every response goes through [`normalize`], which decides success or
//! failure and decodes the body exactly once.
//!
//! # Decision table
//!
//! | Status | Body | Outcome |
//! |--------|------|---------|
//! | 204 | not read | `Ok`, [`Payload::Empty`] |
//! | 2xx | JSON | `Ok`, [`Payload::Json`] |
//! | 2xx | empty or not JSON | `Ok`, [`Payload::Empty`] |
//! | other | JSON | [`CloudError::Server`] with the body verbatim |
//! | other | empty or not JSON | [`CloudError::Protocol`], `"<status> - <reason>"` |
//!
//! Transport failures never reach this module; the executor maps them to
//! [`CloudError::Transport`] directly.

use crate::client::transport::TransportResponse;
use crate::client::utils::status_line;
use crate::error::{CloudError, Result};
use crate::types::{ApiResponse, Payload};
use http::StatusCode;
use serde_json::Value;

/// Parse a body as JSON, treating empty and malformed bodies alike.
fn parse_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(body).ok()
}

/// Convert a raw transport response into a normalized outcome.
///
/// # Examples
///
/// ```
/// use opencloud_http::client::{normalize, TransportResponse};
/// use opencloud_http::{CloudError, Payload};
/// use bytes::Bytes;
/// use http::{HeaderMap, StatusCode};
/// use serde_json::json;
///
/// let ok = normalize(TransportResponse {
///     status: StatusCode::OK,
///     headers: HeaderMap::new(),
///     body: Bytes::from_static(br#"{"v":1}"#),
/// }).unwrap();
/// assert_eq!(ok.payload, Payload::Json(json!({"v": 1})));
///
/// let err = normalize(TransportResponse {
///     status: StatusCode::INTERNAL_SERVER_ERROR,
///     headers: HeaderMap::new(),
///     body: Bytes::from_static(b"<html>oops</html>"),
/// }).unwrap_err();
/// assert_eq!(err.to_string(), "500 - Internal Server Error");
/// ```
pub fn normalize(response: TransportResponse) -> Result<ApiResponse> {
    let TransportResponse {
        status,
        headers,
        body,
    } = response;

    if status == StatusCode::NO_CONTENT {
        return Ok(ApiResponse {
            status: status.as_u16(),
            headers,
            payload: Payload::Empty,
        });
    }

    let parsed = parse_body(&body);

    if status.is_success() {
        return Ok(ApiResponse {
            status: status.as_u16(),
            headers,
            payload: parsed.map(Payload::Json).unwrap_or(Payload::Empty),
        });
    }

    match parsed {
        Some(body) => Err(CloudError::Server {
            status: status.as_u16(),
            body,
        }),
        None => Err(CloudError::Protocol {
            status: status.as_u16(),
            message: status_line(status),
        }),
    }
}
