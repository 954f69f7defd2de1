//! Asset uploads.
//!
//! Creating and updating an asset are long-running on the server side: both
//! return an [`AssetOperation`] whose `path` is polled with
//! [`AssetService::get`] until `done` is set.
//!
//! # Examples
//!
//! ```ignore
//! use opencloud_http::client::ApiClient;
//! use opencloud_http::services::{AssetOwner, AssetService, AssetType, CreateAssetOptions};
//!
//! let assets = AssetService::new(ApiClient::new("key"), 1234, AssetOwner::User);
//! let op = assets
//!     .create(AssetType::Decal, "Logo", std::fs::read("logo.png")?, CreateAssetOptions {
//!         file_name: Some("logo.png".into()),
//!         content_type: Some("image/png".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let status = assets.get(op.path.as_deref().unwrap_or_default()).await?;
//! if let Some(asset) = status.created_asset() {
//!     println!("asset id: {:?}", asset.asset_id);
//! }
//! ```

use crate::client::{join_resource_path, require_non_empty, ApiClient};
use crate::error::Result;
use crate::protocol::constants::multipart;
use crate::types::{ApiRequest, MultipartPart};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Description used when the caller gives none.
pub const DEFAULT_DESCRIPTION: &str = "Created from Cloud API";

/// Who owns the assets created through an [`AssetService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetOwner {
    /// Owner id is a user id
    #[default]
    User,
    /// Owner id is a group id
    Group,
}

/// Asset type of a new asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetType {
    /// Audio
    Audio,
    /// Decal
    Decal,
    /// Model
    Model,
    /// Any other type name, sent as-is
    Other(String),
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Audio => f.write_str("Audio"),
            AssetType::Decal => f.write_str("Decal"),
            AssetType::Model => f.write_str("Model"),
            AssetType::Other(name) => f.write_str(name),
        }
    }
}

impl From<&str> for AssetType {
    fn from(name: &str) -> Self {
        match name {
            "Audio" => AssetType::Audio,
            "Decal" => AssetType::Decal,
            "Model" => AssetType::Model,
            other => AssetType::Other(other.to_string()),
        }
    }
}

/// Options for [`AssetService::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateAssetOptions {
    /// Asset description; defaults to [`DEFAULT_DESCRIPTION`]
    pub description: Option<String>,
    /// File name of the uploaded content
    pub file_name: Option<String>,
    /// Content type of the uploaded content
    pub content_type: Option<String>,
}

/// Asset as described by a finished operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    /// Resource path
    #[serde(default)]
    pub path: Option<String>,
    /// Asset id
    #[serde(default)]
    pub asset_id: Option<String>,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Asset type
    #[serde(default)]
    pub asset_type: Option<String>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A long-running asset operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOperation {
    /// Operation path, passed to [`AssetService::get`]
    #[serde(default)]
    pub path: Option<String>,
    /// Set once the operation finished
    #[serde(default)]
    pub done: bool,
    /// Resulting asset, once done
    #[serde(default)]
    pub response: Option<AssetDescriptor>,
    /// Failure details, once done
    #[serde(default)]
    pub error: Option<Value>,
}

impl AssetOperation {
    /// The created or updated asset, if the operation finished successfully.
    pub fn created_asset(&self) -> Option<&AssetDescriptor> {
        if self.done {
            self.response.as_ref()
        } else {
            None
        }
    }
}

/// Assets owned by one user or group.
#[derive(Debug, Clone)]
pub struct AssetService {
    client: ApiClient,
    owner_id: u64,
    owner: AssetOwner,
    base_url: String,
}

impl AssetService {
    /// Bind to `owner_id`, interpreted according to `owner`.
    pub fn new(client: ApiClient, owner_id: u64, owner: AssetOwner) -> Self {
        let base_url = client.config().url("/assets/v1");
        Self {
            client,
            owner_id,
            owner,
            base_url,
        }
    }

    /// Owner id.
    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    /// Owner kind.
    pub fn owner(&self) -> AssetOwner {
        self.owner
    }

    /// Base URL of every request made by this service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn creator(&self) -> Value {
        match self.owner {
            AssetOwner::User => json!({ "userId": self.owner_id }),
            AssetOwner::Group => json!({ "groupId": self.owner_id }),
        }
    }

    /// Upload a new asset.
    pub async fn create(
        &self,
        asset_type: AssetType,
        name: &str,
        content: impl Into<Bytes>,
        options: CreateAssetOptions,
    ) -> Result<AssetOperation> {
        require_non_empty("asset name", name)?;

        let descriptor = json!({
            "assetType": asset_type.to_string(),
            "displayName": name,
            "description": options.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION),
            "creationContext": {
                "creator": self.creator(),
            },
        });

        let mut file = MultipartPart::file(
            multipart::FILE_CONTENT,
            content.into(),
            options.file_name.unwrap_or_else(|| multipart::FILE_CONTENT.to_string()),
        );
        if let Some(content_type) = options.content_type {
            file = file.with_content_type(content_type);
        }

        let request = ApiRequest::post(format!("{}/assets", self.base_url)).with_multipart(vec![
            MultipartPart::text(multipart::REQUEST, serde_json::to_string(&descriptor)?),
            file,
        ]);

        self.client.send(request).await?.payload.decode()
    }

    /// Replace the content of an existing asset.
    pub async fn update(&self, asset_id: u64, content: impl Into<Bytes>) -> Result<AssetOperation> {
        let descriptor = json!({ "assetId": asset_id });

        let request = ApiRequest::patch(format!("{}/assets", self.base_url)).with_multipart(vec![
            MultipartPart::text(multipart::REQUEST, serde_json::to_string(&descriptor)?),
            MultipartPart::file(multipart::FILE_CONTENT, content.into(), multipart::FILE_CONTENT),
        ]);

        self.client.send(request).await?.payload.decode()
    }

    /// Poll an operation by the path returned from [`create`](Self::create)
    /// or [`update`](Self::update).
    pub async fn get(&self, operation_path: &str) -> Result<AssetOperation> {
        let url = join_resource_path(&self.base_url, operation_path)?;
        self.client.send(ApiRequest::get(url)).await?.payload.decode()
    }
}
