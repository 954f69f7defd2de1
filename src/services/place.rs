//! Place publishing.

use crate::client::ApiClient;
use crate::error::Result;
use crate::protocol::constants::content_types;
use crate::protocol::QueryParams;
use crate::types::ApiRequest;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a publish is saved only or also made live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionType {
    /// Saved, not live
    Saved,
    /// Saved and published
    Published,
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionType::Saved => f.write_str("Saved"),
            VersionType::Published => f.write_str("Published"),
        }
    }
}

/// Place file encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// `.rbxlx`, structured text
    Rbxlx,
    /// `.rbxl`, binary
    Rbxl,
}

impl FileType {
    /// Content type sent with the file.
    pub fn content_type(self) -> &'static str {
        match self {
            FileType::Rbxlx => content_types::XML,
            FileType::Rbxl => content_types::OCTET_STREAM,
        }
    }
}

/// Result of [`Place::publish`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePublishResponse {
    /// Version number assigned by the server
    pub version_number: u64,
}

/// Places of one universe.
#[derive(Debug, Clone)]
pub struct PlaceService {
    client: ApiClient,
    universe_id: u64,
    base_url: String,
}

impl PlaceService {
    /// Bind to `universe_id`.
    pub fn new(client: ApiClient, universe_id: u64) -> Self {
        let base_url = client
            .config()
            .url(&format!("/universes/v1/{}", universe_id));
        Self {
            client,
            universe_id,
            base_url,
        }
    }

    /// Universe id.
    pub fn universe_id(&self) -> u64 {
        self.universe_id
    }

    /// Base URL of every request made by this service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle to `place_id`. Makes no request.
    pub fn place(&self, place_id: u64) -> Place {
        Place {
            client: self.client.clone(),
            universe_id: self.universe_id,
            place_id,
            base_url: format!("{}/places/{}", self.base_url, place_id),
        }
    }
}

/// One place.
#[derive(Debug, Clone)]
pub struct Place {
    client: ApiClient,
    universe_id: u64,
    place_id: u64,
    base_url: String,
}

impl Place {
    /// Universe id.
    pub fn universe_id(&self) -> u64 {
        self.universe_id
    }

    /// Place id.
    pub fn place_id(&self) -> u64 {
        self.place_id
    }

    /// Upload a new version of the place file.
    pub async fn publish(
        &self,
        version_type: VersionType,
        file_type: FileType,
        content: impl Into<Bytes>,
    ) -> Result<PlacePublishResponse> {
        let params = QueryParams::new().with("versionType", version_type);
        let url = format!("{}/versions{}", self.base_url, self.client.query(&params));

        let request = ApiRequest::post(url).with_body(file_type.content_type(), content);
        self.client.send(request).await?.payload.decode()
    }
}
