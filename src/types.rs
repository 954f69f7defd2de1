//! Core Open Cloud types shared by every service.
//!
//! - [`Payload`]: a decoded response body, or the explicit absence of one
//! - [`EntryMetadata`]: data store entry metadata carried in headers
//! - [`WritePrecondition`]: optimistic-concurrency intent for writes
//! - [`ApiRequest`] / [`ApiResponse`]: one call through [`ApiClient`](crate::client::ApiClient)
//!
//! Arbitrary JSON (entry values, attributes, messages) is
//! [`serde_json::Value`] throughout.

use crate::error::{CloudError, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{HeaderMap, HeaderName, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded response body.
///
/// `Empty` means the server sent no body (or one that is not JSON) on a
/// successful response. It is distinct from `Json(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// A JSON body.
    Json(Value),
    /// No body.
    #[default]
    Empty,
}

impl Payload {
    /// True if there was no body.
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    /// Borrow the JSON body, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Empty => None,
        }
    }

    /// Take the JSON body, if any.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Empty => None,
        }
    }

    /// Deserialize the body into `T`.
    ///
    /// Fails with [`CloudError::MissingPayload`] when there is no body.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Payload::Json(value) => Ok(serde_json::from_value(value)?),
            Payload::Empty => Err(CloudError::MissingPayload),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

/// Data store entry metadata.
///
/// `attributes` and `user_ids` are caller-assigned on write. The remaining
/// fields are assigned by the server and only read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    /// `roblox-entry-created-time`
    pub created_time: Option<DateTime<Utc>>,
    /// `last-modified`
    pub last_modified: Option<DateTime<Utc>>,
    /// `roblox-entry-version`
    pub version: Option<String>,
    /// `roblox-entry-attributes`
    pub attributes: Option<Value>,
    /// `roblox-entry-userids`
    pub user_ids: Option<Vec<u64>>,
    /// `content-md5`
    pub content_md5: Option<String>,
}

impl EntryMetadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set caller attributes.
    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Set associated user ids.
    pub fn with_user_ids(mut self, user_ids: Vec<u64>) -> Self {
        self.user_ids = Some(user_ids);
        self
    }
}

/// Optimistic-concurrency intent for a write.
///
/// Evaluated by the server. The client only transmits what the caller set:
/// neither field is ever derived from the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritePrecondition {
    /// Only write if the current version equals this token.
    pub match_version: Option<String>,
    /// Only write if no entry exists (`Some(true)`), or explicitly allow
    /// overwriting (`Some(false)`).
    pub exclusive_create: Option<bool>,
}

impl WritePrecondition {
    /// No precondition.
    pub fn none() -> Self {
        Self::default()
    }

    /// Write only if the current version matches.
    pub fn match_version(version: impl Into<String>) -> Self {
        Self {
            match_version: Some(version.into()),
            exclusive_create: None,
        }
    }

    /// Write only if the entry does not exist.
    pub fn exclusive_create() -> Self {
        Self {
            match_version: None,
            exclusive_create: Some(true),
        }
    }

    /// True if nothing is set.
    pub fn is_none(&self) -> bool {
        self.match_version.is_none() && self.exclusive_create.is_none()
    }
}

/// Request body handed to the transport.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Raw bytes with a content type.
    Bytes {
        /// `content-type` header value
        content_type: String,
        /// Body bytes, sent unchanged
        data: Bytes,
    },
    /// `multipart/form-data`; the transport builds the boundary.
    Multipart(Vec<MultipartPart>),
}

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub struct MultipartPart {
    /// Form field name
    pub name: String,
    /// Part content
    pub data: Bytes,
    /// Optional file name
    pub file_name: Option<String>,
    /// Optional part content type
    pub content_type: Option<String>,
}

impl MultipartPart {
    /// A text part.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Bytes::from(value.into()),
            file_name: None,
            content_type: None,
        }
    }

    /// A file part.
    pub fn file(name: impl Into<String>, data: Bytes, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data,
            file_name: Some(file_name.into()),
            content_type: None,
        }
    }

    /// Set the part content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A single API call, before the credential is attached.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL, query string included
    pub url: String,
    /// Extra headers, in order
    pub headers: Vec<(HeaderName, String)>,
    /// Body
    pub body: RequestBody,
}

impl ApiRequest {
    /// Create a request.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// PATCH request.
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Add a header.
    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Add several headers.
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (HeaderName, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set a raw body.
    pub fn with_body(mut self, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.body = RequestBody::Bytes {
            content_type: content_type.into(),
            data: data.into(),
        };
        self
    }

    /// Set a multipart body.
    pub fn with_multipart(mut self, parts: Vec<MultipartPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }
}

/// A normalized successful response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded body
    pub payload: Payload,
}
