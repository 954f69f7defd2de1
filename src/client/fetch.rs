//! Request executor shared by every service.
//!
//! [`ApiClient`] owns the credential, the configuration and the transport.
//! Services build an [`ApiRequest`] and call [`ApiClient::send`], which
//! attaches `x-api-key`, validates headers, sends, and normalizes.
//!
//! # Examples
//!
//! ```ignore
//! use opencloud_http::client::ApiClient;
//! use opencloud_http::ApiRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("my-api-key");
//!     let url = client.config().url("/cloud/v2/groups/7");
//!     let response = client.send(ApiRequest::get(url)).await?;
//!     println!("Status: {}", response.status);
//!     Ok(())
//! }
//! ```

use crate::client::credential::ApiKey;
use crate::client::normalize::normalize;
use crate::client::transport::{ReqwestTransport, Transport, TransportRequest};
use crate::client::utils::validate_content_type;
use crate::client::ClientConfig;
use crate::error::{CloudError, Result};
use crate::protocol::constants::headers;
use crate::protocol::QueryParams;
use crate::types::{ApiRequest, ApiResponse, RequestBody};
use http::header::USER_AGENT;
use http::{HeaderMap, HeaderValue};
use std::fmt;
use std::sync::Arc;

/// Executes Open Cloud requests.
///
/// Cheap to clone; clones share the transport and configuration. Holds no
/// per-call state, so one instance can serve any number of concurrent calls.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    api_key: ApiKey,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    /// Client with the default configuration and reqwest transport.
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self::with_transport(api_key, ClientConfig::default(), Arc::new(ReqwestTransport::new()))
    }

    /// Client with a custom configuration and the reqwest transport.
    ///
    /// Fails with [`CloudError::InvalidParameter`] if the user agent is not a
    /// valid header value or the transport cannot be built.
    pub fn with_config(api_key: impl Into<ApiKey>, config: ClientConfig) -> Result<Self> {
        user_agent(&config)?;
        let transport = Arc::new(ReqwestTransport::with_config(&config)?);
        Ok(Self::with_transport(api_key, config, transport))
    }

    /// Client with a custom transport.
    pub fn with_transport(
        api_key: impl Into<ApiKey>,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            config: Arc::new(config),
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Encode query parameters with the configured escaping.
    pub fn query(&self, params: &QueryParams) -> String {
        params.encode(self.config.query_encoding)
    }

    /// Send one request and normalize the response.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let ApiRequest {
            method,
            url,
            headers: extra,
            body,
        } = request;

        let mut header_map = HeaderMap::new();
        let mut key = HeaderValue::from_str(self.api_key.expose()).map_err(|_| {
            CloudError::InvalidParameter("API key contains invalid header characters".into())
        })?;
        key.set_sensitive(true);
        header_map.insert(headers::API_KEY, key);
        header_map.insert(USER_AGENT, user_agent(&self.config)?);

        validate_body(&body)?;

        for (name, value) in extra {
            let value = HeaderValue::from_str(&value).map_err(|_| {
                CloudError::InvalidParameter(format!("invalid value for header {}", name))
            })?;
            header_map.insert(name, value);
        }

        tracing::debug!(method = %method, url = %url, "open cloud request");

        let outcome = match self
            .transport
            .send(TransportRequest {
                method: method.clone(),
                url: url.clone(),
                headers: header_map,
                body,
            })
            .await
        {
            Ok(response) => {
                tracing::debug!(status = response.status.as_u16(), url = %url, "open cloud response");
                normalize(response)
            }
            Err(e) => Err(CloudError::Transport(e)),
        };

        if let Err(e) = &outcome {
            if self.config.enable_logging {
                tracing::warn!(method = %method, url = %url, "open cloud request failed: {}", e);
            }
        }

        outcome
    }
}

fn user_agent(config: &ClientConfig) -> Result<HeaderValue> {
    HeaderValue::from_str(&config.user_agent).map_err(|_| {
        CloudError::InvalidParameter(format!("invalid user agent: {:?}", config.user_agent))
    })
}

/// Every content type in `body` must be a well-formed media type.
fn validate_body(body: &RequestBody) -> Result<()> {
    match body {
        RequestBody::Empty => Ok(()),
        RequestBody::Bytes { content_type, .. } => validate_content_type(content_type),
        RequestBody::Multipart(parts) => parts
            .iter()
            .filter_map(|part| part.content_type.as_deref())
            .try_for_each(validate_content_type),
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_key", &self.api_key)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
