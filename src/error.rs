//! Error types for Open Cloud operations.
//!
//! Every operation resolves to a single [`Result`]. The failure side collapses
//! the shapes an HTTP call can fail in into one enum:
//!
//! | Kind | Variants | Origin |
//! |------|----------|--------|
//! | Validation | [`CloudError::UnknownService`], [`CloudError::NotRegistered`], [`CloudError::InvalidParameter`] | Caller input, raised before any request |
//! | Server | [`CloudError::Server`] | Non-200 status with a JSON error body |
//! | Protocol | [`CloudError::Protocol`] | Non-200 status with an unparseable body |
//! | Transport | [`CloudError::Transport`] | No response obtained at all |
//! | Decode | [`CloudError::Json`], [`CloudError::HeaderParse`], [`CloudError::MissingPayload`] | A successful response that could not be reshaped |
//!
//! Nothing here is retried. A failure is local to the call that produced it.

use serde_json::Value;
use thiserror::Error;

/// Boxed error produced by a [`Transport`](crate::client::Transport).
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for Open Cloud operations.
pub type Result<T> = std::result::Result<T, CloudError>;

/// Error returned by every Open Cloud operation.
#[derive(Debug, Error)]
pub enum CloudError {
    /// The service name is not one of the known resource families.
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// No service has been registered under this name.
    #[error("Service not registered: {0}")]
    NotRegistered(String),

    /// A parameter was rejected before the request was built.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The server answered with a non-200 status and a JSON error body.
    ///
    /// The body is carried verbatim.
    #[error("Server error {status}: {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Parsed error payload as sent by the server
        body: Value,
    },

    /// The server answered with a non-200 status and a body that is not JSON.
    ///
    /// The raw body is not kept.
    #[error("{message}")]
    Protocol {
        /// HTTP status code
        status: u16,
        /// `"<status> - <status text>"`
        message: String,
    },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[source] TransportError),

    /// A JSON value could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A response header carried a value that could not be parsed.
    #[error("Header parse error: {0}")]
    HeaderParse(String),

    /// The operation expected a response body but the server sent none.
    #[error("Response had no payload")]
    MissingPayload,
}

/// Coarse classification of a [`CloudError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally from caller input.
    Validation,
    /// Server error body passed through.
    Server,
    /// Non-JSON failure response.
    Protocol,
    /// No response obtained.
    Transport,
    /// Successful response that could not be decoded.
    Decode,
}

impl CloudError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CloudError::UnknownService(_)
            | CloudError::NotRegistered(_)
            | CloudError::InvalidParameter(_) => ErrorKind::Validation,
            CloudError::Server { .. } => ErrorKind::Server,
            CloudError::Protocol { .. } => ErrorKind::Protocol,
            CloudError::Transport(_) => ErrorKind::Transport,
            CloudError::Json(_) | CloudError::HeaderParse(_) | CloudError::MissingPayload => {
                ErrorKind::Decode
            }
        }
    }

    /// True for errors raised from caller input before any request was sent.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudError::Server { status, .. } | CloudError::Protocol { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Server error payload, if the failure carried one.
    pub fn server_body(&self) -> Option<&Value> {
        match self {
            CloudError::Server { body, .. } => Some(body),
            _ => None,
        }
    }
}
