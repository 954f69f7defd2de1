//! Group metadata, read-only.
//!
//! Responses are returned as raw JSON; their shape follows the v2 group
//! resources and is not modelled here.

use crate::client::ApiClient;
use crate::error::Result;
use crate::protocol::constants::content_types;
use crate::protocol::QueryParams;
use crate::types::ApiRequest;
use http::header::CONTENT_TYPE;
use serde_json::Value;

/// Options for [`GroupService::get_members`].
#[derive(Debug, Clone, Default)]
pub struct MembersOptions {
    /// Continuation token from a previous page
    pub page_token: Option<String>,
    /// Server-side filter expression
    pub filter: Option<String>,
}

/// Options for [`GroupService::get_roles`].
#[derive(Debug, Clone, Default)]
pub struct RolesOptions {
    /// Continuation token from a previous page
    pub page_token: Option<String>,
}

/// One group.
#[derive(Debug, Clone)]
pub struct GroupService {
    client: ApiClient,
    group_id: u64,
    base_url: String,
}

impl GroupService {
    /// Bind to `group_id`.
    pub fn new(client: ApiClient, group_id: u64) -> Self {
        let base_url = client
            .config()
            .url(&format!("/cloud/v2/groups/{}", group_id));
        Self {
            client,
            group_id,
            base_url,
        }
    }

    /// Group id.
    pub fn group_id(&self) -> u64 {
        self.group_id
    }

    /// Base URL of every request made by this service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, path: &str, params: &QueryParams) -> Result<Value> {
        let url = format!("{}{}{}", self.base_url, path, self.client.query(params));
        let request = ApiRequest::get(url).with_header(CONTENT_TYPE, content_types::JSON);
        self.client.send(request).await?.payload.decode()
    }

    /// Group name, owner, description and member count.
    pub async fn get_info(&self) -> Result<Value> {
        self.fetch("", &QueryParams::new()).await
    }

    /// One page of memberships.
    pub async fn get_members(&self, max_page_size: u32, options: MembersOptions) -> Result<Value> {
        let params = QueryParams::new()
            .with("maxPageSize", max_page_size)
            .with_opt("pageToken", options.page_token)
            .with_opt("filter", options.filter);
        self.fetch("/memberships", &params).await
    }

    /// One page of roles.
    pub async fn get_roles(&self, max_page_size: u32, options: RolesOptions) -> Result<Value> {
        let params = QueryParams::new()
            .with("maxPageSize", max_page_size)
            .with_opt("pageToken", options.page_token);
        self.fetch("/roles", &params).await
    }

    /// Current group shout.
    pub async fn get_shout(&self) -> Result<Value> {
        self.fetch("/shout", &QueryParams::new()).await
    }
}
