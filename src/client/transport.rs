//! HTTP transport seam.
//!
//! The core never talks to the network directly. It hands a fully built
//! [`TransportRequest`] to a [`Transport`] and gets back status, headers and
//! body bytes, or a transport error when no response was obtained.
//!
//! [`ReqwestTransport`] is the default implementation.

use crate::client::ClientConfig;
use crate::error::{CloudError, Result, TransportError};
use crate::types::{MultipartPart, RequestBody};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;

/// A request ready to be sent: credential attached, headers validated.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Headers
    pub headers: HeaderMap,
    /// Body
    pub body: RequestBody,
}

/// Raw response from the transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body bytes; left empty for `204 No Content`
    pub body: Bytes,
}

/// Sends one request and returns one response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`.
    ///
    /// Returns `Err` only when no response was obtained. Any status code,
    /// success or not, is an `Ok`.
    async fn send(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with reqwest defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport honouring the timeout of `config`.
    ///
    /// Fails with [`CloudError::InvalidParameter`] when reqwest cannot build a
    /// client from the configuration.
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        let client = builder.build().map_err(|e| {
            CloudError::InvalidParameter(format!("invalid client configuration: {}", e))
        })?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn multipart_form(
    parts: Vec<MultipartPart>,
) -> std::result::Result<reqwest::multipart::Form, reqwest::Error> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let mut body = reqwest::multipart::Part::bytes(part.data.to_vec());
        if let Some(file_name) = part.file_name {
            body = body.file_name(file_name);
        }
        if let Some(content_type) = part.content_type {
            body = body.mime_str(&content_type)?;
        }
        form = form.part(part.name, body);
    }
    Ok(form)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut req_builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        req_builder = match request.body {
            RequestBody::Empty => req_builder,
            RequestBody::Bytes { content_type, data } => req_builder
                .header(http::header::CONTENT_TYPE, content_type)
                .body(data),
            RequestBody::Multipart(parts) => req_builder.multipart(multipart_form(parts)?),
        };

        let response = req_builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();

        let body = if status == StatusCode::NO_CONTENT {
            Bytes::new()
        } else {
            response.bytes().await?
        };

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
