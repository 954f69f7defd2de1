//! Cross-server messaging.
//!
//! ```ignore
//! use opencloud_http::client::ApiClient;
//! use opencloud_http::services::MessagingService;
//! use serde_json::json;
//!
//! let service = MessagingService::new(ApiClient::new("key"), 1234);
//! service.topic("announcements").publish(&json!("server restarting")).await?;
//! ```

use crate::client::{require_non_empty, ApiClient};
use crate::error::Result;
use crate::protocol::constants::content_types;
use crate::types::ApiRequest;
use serde_json::{json, Value};

/// Messaging for one universe.
#[derive(Debug, Clone)]
pub struct MessagingService {
    client: ApiClient,
    universe_id: u64,
    base_url: String,
}

impl MessagingService {
    /// Bind to `universe_id`.
    pub fn new(client: ApiClient, universe_id: u64) -> Self {
        let base_url = client
            .config()
            .url(&format!("/messaging-service/v1/universes/{}", universe_id));
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

    /// Handle to the topic `name`. Makes no request.
    pub fn topic(&self, name: impl Into<String>) -> Topic {
        Topic {
            client: self.client.clone(),
            name: name.into(),
            universe_id: self.universe_id,
            base_url: self.base_url.clone(),
        }
    }
}

/// One messaging topic.
#[derive(Debug, Clone)]
pub struct Topic {
    client: ApiClient,
    name: String,
    universe_id: u64,
    base_url: String,
}

impl Topic {
    /// Topic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Universe id.
    pub fn universe_id(&self) -> u64 {
        self.universe_id
    }

    /// Publish `message` to every subscribed server.
    ///
    /// The value is wrapped as `{"message": ...}`.
    pub async fn publish(&self, message: &Value) -> Result<()> {
        require_non_empty("topic name", &self.name)?;

        let url = format!(
            "{}/topics/{}",
            self.base_url,
            urlencoding::encode(&self.name)
        );
        let body = serde_json::to_vec(&json!({ "message": message }))?;

        self.client
            .send(ApiRequest::post(url).with_body(content_types::JSON, body))
            .await?;
        Ok(())
    }
}
