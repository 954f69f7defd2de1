//! Client configuration.

use crate::protocol::constants::DEFAULT_BASE_URL;
use crate::protocol::QueryEncoding;

/// Configuration shared by every service built from one [`ApiClient`](super::ApiClient).
///
/// # Examples
///
/// ```
/// use opencloud_http::client::ClientConfig;
///
/// let config = ClientConfig {
///     base_url: "http://localhost:8080".into(),
///     ..Default::default()
/// };
/// assert_eq!(config.url("/assets/v1"), "http://localhost:8080/assets/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin, without a trailing slash
    pub base_url: String,
    /// Query string escaping
    pub query_encoding: QueryEncoding,
    /// Timeout applied by the default reqwest transport; `None` leaves the
    /// transport's own behaviour unchanged
    pub request_timeout_ms: Option<u64>,
    /// `user-agent` sent by the default reqwest transport
    pub user_agent: String,
    /// Emit `warn` events for failed calls
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            query_encoding: QueryEncoding::Percent,
            request_timeout_ms: None,
            user_agent: concat!("opencloud_http/", env!("CARGO_PKG_VERSION")).to_string(),
            enable_logging: true,
        }
    }
}

impl ClientConfig {
    /// Default configuration against another origin.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Join `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
