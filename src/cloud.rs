//! One-universe convenience bundle.

use crate::client::{ApiClient, ApiKey, ClientConfig};
use crate::error::Result;
use crate::services::{DataStoreService, MessagingService, PlaceService};

/// Data store, messaging and place services for a single universe, sharing
/// one [`ApiClient`].
///
/// # Examples
///
/// ```
/// use opencloud_http::CloudClient;
///
/// let cloud = CloudClient::new(1234, "my-api-key");
/// assert_eq!(cloud.data_store_service.universe_id(), 1234);
/// assert_eq!(cloud.place_service.universe_id(), 1234);
/// ```
#[derive(Debug, Clone)]
pub struct CloudClient {
    /// Universe every service is bound to
    pub universe_id: u64,
    /// Data stores of the universe
    pub data_store_service: DataStoreService,
    /// Messaging for the universe
    pub messaging_service: MessagingService,
    /// Places of the universe
    pub place_service: PlaceService,
}

impl CloudClient {
    /// Bundle with the default configuration.
    pub fn new(universe_id: u64, api_key: impl Into<ApiKey>) -> Self {
        Self::with_client(universe_id, ApiClient::new(api_key))
    }

    /// Bundle using `config`.
    pub fn with_config(
        universe_id: u64,
        api_key: impl Into<ApiKey>,
        config: ClientConfig,
    ) -> Result<Self> {
        Ok(Self::with_client(
            universe_id,
            ApiClient::with_config(api_key, config)?,
        ))
    }

    /// Bundle sending through `client`.
    pub fn with_client(universe_id: u64, client: ApiClient) -> Self {
        Self {
            universe_id,
            data_store_service: DataStoreService::new(client.clone(), universe_id),
            messaging_service: MessagingService::new(client.clone(), universe_id),
            place_service: PlaceService::new(client, universe_id),
        }
    }
}
