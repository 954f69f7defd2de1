//! Open Cloud HTTP client core.
//!
//! This module turns typed requests into HTTP calls and HTTP responses back
//! into typed outcomes. The services in [`crate::services`] are thin layers on
//! top of it.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch       - ApiClient, the request executor
//! ├── normalize   - status + body -> success or CloudError
//! ├── transport   - Transport trait and the reqwest implementation
//! ├── credential  - ApiKey
//! ├── config      - Client configuration
//! └── utils       - Validation and formatting helpers
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ApiClient`] | Attaches the credential, sends, normalizes |
//! | [`Transport`] | Pluggable HTTP transport |
//! | [`ReqwestTransport`] | Default transport |
//! | [`ApiKey`] | Redacted credential |
//! | [`ClientConfig`] | Client configuration options |
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use opencloud_http::client::{ApiClient, ClientConfig};
//!
//! // Default configuration
//! let client = ApiClient::new("my-api-key");
//!
//! // Custom configuration
//! let config = ClientConfig {
//!     base_url: "http://localhost:8080".into(),
//!     enable_logging: false,
//!     ..Default::default()
//! };
//! let client = ApiClient::with_config("my-api-key", config).unwrap();
//! assert_eq!(client.config().base_url, "http://localhost:8080");
//! ```
//!
//! ## Validation helpers
//!
//! ```
//! use opencloud_http::client::{status_line, validate_version_id};
//! use http::StatusCode;
//!
//! assert_eq!(status_line(StatusCode::BAD_GATEWAY), "502 - Bad Gateway");
//! assert!(validate_version_id("08DA1E8AF6C4D1F6.0000000001.08DA1E8AF6C4D1F6.01").is_ok());
//! assert!(validate_version_id("not a token").is_err());
//! ```

mod config;
mod credential;
mod fetch;
mod normalize;
mod transport;
mod utils;

pub use config::ClientConfig;
pub use credential::ApiKey;
pub use fetch::ApiClient;
pub use normalize::normalize;
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
pub use utils::*;
