//! Shared test doubles.

use crate::client::{ApiClient, ClientConfig, Transport, TransportRequest, TransportResponse};
use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use parking_lot::Mutex;
use std::sync::Arc;

/// Replays one canned response and records every request.
pub(crate) struct Canned {
    status: StatusCode,
    headers: HeaderMap,
    body: &'static [u8],
    seen: Mutex<Vec<TransportRequest>>,
}

impl Canned {
    pub(crate) fn new(status: u16, body: &'static [u8]) -> Arc<Self> {
        Self::with_headers(status, HeaderMap::new(), body)
    }

    pub(crate) fn with_headers(status: u16, headers: HeaderMap, body: &'static [u8]) -> Arc<Self> {
        Arc::new(Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.seen.lock().clone()
    }

    pub(crate) fn last(&self) -> TransportRequest {
        self.seen.lock().last().cloned().expect("a request was sent")
    }

    /// An [`ApiClient`] against `https://h` sending through this transport.
    pub(crate) fn client(self: &Arc<Self>) -> ApiClient {
        ApiClient::with_transport("key", ClientConfig::with_base_url("https://h"), self.clone())
    }
}

#[async_trait]
impl Transport for Canned {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.seen.lock().push(request);
        Ok(TransportResponse {
            status: self.status,
            headers: self.headers.clone(),
            body: Bytes::from_static(self.body),
        })
    }
}
