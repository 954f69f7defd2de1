//! Standard data stores.
//!
//! [`DataStoreService`] is bound to one universe and lists its data stores.
//! [`DataStore`] is bound to one named store (and optionally a scope) and
//! reads and writes its entries.
//!
//! # Wire format
//!
//! | Operation | Method | Path (under the service base) |
//! |-----------|--------|-------------------------------|
//! | list data stores | GET | `` |
//! | list entries | GET | `/datastore/entries` |
//! | get, set, delete | GET, POST, DELETE | `/datastore/entries/entry` |
//! | increment | POST | `/datastore/entries/entry/increment` |
//! | list versions | GET | `/datastore/entries/entry/versions` |
//! | get version | GET | `/datastore/entries/entry/versions/version` |
//!
//! Entry values travel as the JSON body; entry metadata travels in headers
//! (see [`crate::protocol::headers`]).
//!
//! # Examples
//!
//! ```ignore
//! use opencloud_http::client::ApiClient;
//! use opencloud_http::services::{DataStoreOptions, DataStoreService, SetEntryOptions};
//! use serde_json::json;
//!
//! let service = DataStoreService::new(ApiClient::new("key"), 1234);
//! let store = service.data_store("Players", DataStoreOptions::default());
//!
//! let written = store
//!     .set("user_1", &json!({"coins": 10}), SetEntryOptions::new().exclusive_create())
//!     .await?;
//! let entry = store.get("user_1").await?;
//! assert_eq!(entry.metadata.version.as_deref(), Some(written.version.as_str()));
//! ```

use crate::client::{require_non_empty, validate_version_id, ApiClient};
use crate::error::Result;
use crate::protocol::constants::content_types;
use crate::protocol::{
    content_md5, decode_metadata_headers, encode_metadata_headers, format_timestamp, QueryParams,
};
use crate::types::{ApiRequest, EntryMetadata, Payload, WritePrecondition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const ENTRIES: &str = "/datastore/entries";
const ENTRY: &str = "/datastore/entries/entry";
const INCREMENT: &str = "/datastore/entries/entry/increment";
const VERSIONS: &str = "/datastore/entries/entry/versions";
const VERSION: &str = "/datastore/entries/entry/versions/version";

// ========== Options ==========

/// Options for [`DataStoreService::list_data_stores`].
#[derive(Debug, Clone, Default)]
pub struct ListDataStoresOptions {
    /// Only names starting with this prefix
    pub prefix: Option<String>,
    /// Page size
    pub limit: Option<u32>,
    /// Cursor from a previous page
    pub cursor: Option<String>,
}

/// Options fixed for the lifetime of a [`DataStore`] handle.
#[derive(Debug, Clone, Default)]
pub struct DataStoreOptions {
    /// Scope applied to every entry operation; the server default is `global`
    pub scope: Option<String>,
}

/// Options for [`DataStore::list`].
#[derive(Debug, Clone, Default)]
pub struct ListEntriesOptions {
    /// Scope for this call; falls back to the store scope
    pub scope: Option<String>,
    /// List keys across every scope
    pub all_scopes: Option<bool>,
    /// Only keys starting with this prefix
    pub prefix: Option<String>,
    /// Page size
    pub limit: Option<u32>,
    /// Cursor from a previous page
    pub cursor: Option<String>,
}

/// Options for [`DataStore::set`].
#[derive(Debug, Clone, Default)]
pub struct SetEntryOptions {
    /// Caller attributes, sent as `roblox-entry-attributes`
    pub attributes: Option<Value>,
    /// Associated user ids, sent as `roblox-entry-userids`
    pub user_ids: Option<Vec<u64>>,
    /// Optimistic-concurrency intent
    pub precondition: WritePrecondition,
}

impl SetEntryOptions {
    /// No attributes, no user ids, no precondition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set attributes.
    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Set user ids.
    pub fn with_user_ids(mut self, user_ids: Vec<u64>) -> Self {
        self.user_ids = Some(user_ids);
        self
    }

    /// Only write if the current version equals `version`.
    pub fn match_version(mut self, version: impl Into<String>) -> Self {
        self.precondition.match_version = Some(version.into());
        self
    }

    /// Only write if the entry does not exist yet.
    pub fn exclusive_create(mut self) -> Self {
        self.precondition.exclusive_create = Some(true);
        self
    }
}

/// Options for [`DataStore::increment`].
#[derive(Debug, Clone, Default)]
pub struct IncrementOptions {
    /// Caller attributes
    pub attributes: Option<Value>,
    /// Associated user ids
    pub user_ids: Option<Vec<u64>>,
}

/// Order of [`DataStore::list_versions`] results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest first
    Ascending,
    /// Newest first
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("Ascending"),
            SortOrder::Descending => f.write_str("Descending"),
        }
    }
}

/// Options for [`DataStore::list_versions`].
#[derive(Debug, Clone, Default)]
pub struct ListVersionsOptions {
    /// Cursor from a previous page
    pub cursor: Option<String>,
    /// Only versions written at or after this time
    pub start_time: Option<DateTime<Utc>>,
    /// Only versions written at or before this time
    pub end_time: Option<DateTime<Utc>>,
    /// Result order
    pub sort_order: Option<SortOrder>,
    /// Page size
    pub limit: Option<u32>,
}

// ========== Responses ==========

/// One data store in a universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStoreInfo {
    /// Data store name
    pub name: String,
    /// Creation time
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
}

/// A page of data stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDataStoresResponse {
    /// Data stores on this page
    #[serde(default)]
    pub datastores: Vec<DataStoreInfo>,
    /// Cursor for the next page, if any
    #[serde(default)]
    pub next_page_cursor: Option<String>,
}

/// A key returned by [`DataStore::list`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryKey {
    /// Entry key
    pub key: String,
    /// Scope, present when listing across scopes
    #[serde(default)]
    pub scope: Option<String>,
}

/// A page of entry keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesResponse {
    /// Keys on this page
    #[serde(default)]
    pub keys: Vec<EntryKey>,
    /// Cursor for the next page, if any
    #[serde(default)]
    pub next_page_cursor: Option<String>,
}

/// One version of an entry, as returned by writes and version listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryVersion {
    /// Version token
    pub version: String,
    /// Whether this version marks a deletion
    #[serde(default)]
    pub deleted: bool,
    /// Size of the stored value in bytes
    #[serde(default)]
    pub content_length: u64,
    /// When this version was written
    pub created_time: DateTime<Utc>,
    /// When the entry was first created
    pub object_created_time: DateTime<Utc>,
}

/// A page of entry versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVersionsResponse {
    /// Versions on this page
    #[serde(default)]
    pub versions: Vec<EntryVersion>,
    /// Cursor for the next page, if any
    #[serde(default)]
    pub next_page_cursor: Option<String>,
}

/// An entry value together with its metadata headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Stored value
    pub value: Payload,
    /// Metadata decoded from the response headers
    pub metadata: EntryMetadata,
}

// ========== Service ==========

/// Data stores of one universe.
#[derive(Debug, Clone)]
pub struct DataStoreService {
    client: ApiClient,
    universe_id: u64,
    base_url: String,
}

impl DataStoreService {
    /// Bind to `universe_id`.
    pub fn new(client: ApiClient, universe_id: u64) -> Self {
        let base_url = client.config().url(&format!(
            "/datastores/v1/universes/{}/standard-datastores",
            universe_id
        ));
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

    /// List the data stores of the universe, one page at a time.
    pub async fn list_data_stores(
        &self,
        options: ListDataStoresOptions,
    ) -> Result<ListDataStoresResponse> {
        let params = QueryParams::new()
            .with_opt("prefix", options.prefix)
            .with_opt("limit", options.limit)
            .with_opt("cursor", options.cursor);

        let url = format!("{}{}", self.base_url, self.client.query(&params));
        self.client.send(ApiRequest::get(url)).await?.payload.decode()
    }

    /// Handle to the store `name`. Makes no request.
    pub fn data_store(&self, name: impl Into<String>, options: DataStoreOptions) -> DataStore {
        DataStore {
            client: self.client.clone(),
            name: name.into(),
            universe_id: self.universe_id,
            scope: options.scope,
            base_url: self.base_url.clone(),
        }
    }
}

/// One named data store.
#[derive(Debug, Clone)]
pub struct DataStore {
    client: ApiClient,
    name: String,
    universe_id: u64,
    scope: Option<String>,
    base_url: String,
}

impl DataStore {
    /// Store name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Universe id.
    pub fn universe_id(&self) -> u64 {
        self.universe_id
    }

    /// Scope fixed at construction.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// `datastoreName`, `entryKey`, `scope` for single-entry operations.
    fn entry_params(&self, key: &str) -> QueryParams {
        QueryParams::new()
            .with("datastoreName", &self.name)
            .with("entryKey", key)
            .with_opt("scope", self.scope.as_deref())
    }

    fn url(&self, path: &str, params: &QueryParams) -> String {
        format!("{}{}{}", self.base_url, path, self.client.query(params))
    }

    /// Entry plus its header metadata.
    async fn send_for_entry(&self, request: ApiRequest) -> Result<Entry> {
        let response = self.client.send(request).await?;
        let metadata = decode_metadata_headers(&response.headers)?;
        Ok(Entry {
            value: response.payload,
            metadata,
        })
    }

    /// List entry keys, one page at a time.
    pub async fn list(&self, options: ListEntriesOptions) -> Result<ListEntriesResponse> {
        let params = QueryParams::new()
            .with("datastoreName", &self.name)
            .with_opt("scope", options.scope.or_else(|| self.scope.clone()))
            .with_opt("allScopes", options.all_scopes)
            .with_opt("prefix", options.prefix)
            .with_opt("limit", options.limit)
            .with_opt("cursor", options.cursor);

        let url = self.url(ENTRIES, &params);
        self.client.send(ApiRequest::get(url)).await?.payload.decode()
    }

    /// Read an entry and its metadata.
    pub async fn get(&self, key: &str) -> Result<Entry> {
        require_non_empty("entry key", key)?;
        let url = self.url(ENTRY, &self.entry_params(key));
        self.send_for_entry(ApiRequest::get(url)).await
    }

    /// Write an entry.
    ///
    /// The value is serialized once; the same bytes are hashed into
    /// `content-md5` and sent. Preconditions are transmitted only when set.
    /// A failed exclusive create must not be retried blindly: the first
    /// attempt may have succeeded.
    pub async fn set(&self, key: &str, value: &Value, options: SetEntryOptions) -> Result<EntryVersion> {
        require_non_empty("entry key", key)?;
        if let Some(version) = &options.precondition.match_version {
            validate_version_id(version)?;
        }

        let body = serde_json::to_vec(value)?;

        let meta = EntryMetadata {
            attributes: options.attributes,
            user_ids: options.user_ids,
            content_md5: Some(content_md5(&body)),
            ..Default::default()
        };

        let params = self
            .entry_params(key)
            .with_opt("matchVersion", options.precondition.match_version)
            .with_opt("exclusiveCreate", options.precondition.exclusive_create);

        let request = ApiRequest::post(self.url(ENTRY, &params))
            .with_headers(encode_metadata_headers(&meta)?)
            .with_body(content_types::JSON, body);

        self.client.send(request).await?.payload.decode()
    }

    /// Delete an entry. Succeeds on `204 No Content` as well as `200`.
    pub async fn delete(&self, key: &str) -> Result<()> {
        require_non_empty("entry key", key)?;
        let url = self.url(ENTRY, &self.entry_params(key));
        self.client.send(ApiRequest::delete(url)).await?;
        Ok(())
    }

    /// Atomically add `amount` to a numeric entry and return the new value.
    pub async fn increment(&self, key: &str, amount: i64, options: IncrementOptions) -> Result<Entry> {
        require_non_empty("entry key", key)?;

        let meta = EntryMetadata {
            attributes: options.attributes,
            user_ids: options.user_ids,
            ..Default::default()
        };

        let params = self.entry_params(key).with("incrementBy", amount);
        let request = ApiRequest::post(self.url(INCREMENT, &params))
            .with_headers(encode_metadata_headers(&meta)?);

        self.send_for_entry(request).await
    }

    /// Read one historical version of an entry.
    pub async fn get_version(&self, key: &str, version_id: &str) -> Result<Entry> {
        require_non_empty("entry key", key)?;
        validate_version_id(version_id)?;

        let params = self.entry_params(key).with("versionId", version_id);
        self.send_for_entry(ApiRequest::get(self.url(VERSION, &params))).await
    }

    /// List the versions of an entry, one page at a time.
    pub async fn list_versions(&self, key: &str, options: ListVersionsOptions) -> Result<ListVersionsResponse> {
        require_non_empty("entry key", key)?;

        let params = self
            .entry_params(key)
            .with_opt("cursor", options.cursor)
            .with_opt("startTime", options.start_time.as_ref().map(format_timestamp))
            .with_opt("endTime", options.end_time.as_ref().map(format_timestamp))
            .with_opt("sortOrder", options.sort_order)
            .with_opt("limit", options.limit);

        let url = self.url(VERSIONS, &params);
        self.client.send(ApiRequest::get(url)).await?.payload.decode()
    }
}
