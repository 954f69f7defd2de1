//! Named service instances bound to one credential.
//!
//! A [`ServiceRegistry`] maps service family names to constructed service
//! clients. Construction goes through a closed factory table keyed by
//! [`ServiceKind`], so an unknown name is rejected before anything is built.
//!
//! All access is thread-safe via `Arc<RwLock<>>`; clones of a registry share
//! the same map. Each `register` or `get` is atomic and the last write for a
//! name wins.
//!
//! # Examples
//!
//! ```
//! use opencloud_http::services::{ServiceArgs, ServiceRegistry};
//!
//! let registry = ServiceRegistry::new("my-api-key");
//! registry.register("DataStoreService", ServiceArgs::new(1234)).unwrap();
//!
//! let service = registry.get("DataStoreService").unwrap();
//! assert_eq!(service.as_data_store().unwrap().universe_id(), 1234);
//! assert!(registry.get("GroupService").is_err());
//! assert!(registry.register("BadgeService", ServiceArgs::new(1)).is_err());
//! ```

use crate::client::{ApiClient, ApiKey, ClientConfig};
use crate::error::{CloudError, Result};
use crate::protocol::headers::content_md5;
use crate::services::{
    AssetOwner, AssetService, DataStoreService, GroupService, MessagingService, PlaceService,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

// ========== Service kinds ==========

/// The service families a registry can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// [`DataStoreService`]
    DataStore,
    /// [`MessagingService`]
    Messaging,
    /// [`PlaceService`]
    Place,
    /// [`AssetService`]
    Asset,
    /// [`GroupService`]
    Group,
}

impl ServiceKind {
    /// Every kind, in registration-name order.
    pub const ALL: [ServiceKind; 5] = [
        ServiceKind::DataStore,
        ServiceKind::Messaging,
        ServiceKind::Place,
        ServiceKind::Asset,
        ServiceKind::Group,
    ];

    /// Registration name.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::DataStore => "DataStoreService",
            ServiceKind::Messaging => "MessagingService",
            ServiceKind::Place => "PlaceService",
            ServiceKind::Asset => "AssetService",
            ServiceKind::Group => "GroupService",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = CloudError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| CloudError::UnknownService(name.to_string()))
    }
}

/// Constructor arguments for a registered service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceArgs {
    /// Universe id, group id, or asset owner id depending on the kind
    pub id: u64,
    /// Owner kind; only read by [`AssetService`]
    pub owner: AssetOwner,
}

impl ServiceArgs {
    /// Arguments with a user owner.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            owner: AssetOwner::User,
        }
    }

    /// Set the asset owner kind.
    pub fn with_owner(mut self, owner: AssetOwner) -> Self {
        self.owner = owner;
        self
    }
}

// ========== Service handles ==========

/// A constructed service, shared by every caller that looks it up.
#[derive(Debug, Clone)]
pub enum Service {
    /// Data stores
    DataStore(Arc<DataStoreService>),
    /// Messaging
    Messaging(Arc<MessagingService>),
    /// Places
    Place(Arc<PlaceService>),
    /// Assets
    Asset(Arc<AssetService>),
    /// Groups
    Group(Arc<GroupService>),
}

impl Service {
    /// Family of this service.
    pub fn kind(&self) -> ServiceKind {
        match self {
            Service::DataStore(_) => ServiceKind::DataStore,
            Service::Messaging(_) => ServiceKind::Messaging,
            Service::Place(_) => ServiceKind::Place,
            Service::Asset(_) => ServiceKind::Asset,
            Service::Group(_) => ServiceKind::Group,
        }
    }

    /// The data store service, if that is what this is.
    pub fn as_data_store(&self) -> Option<&Arc<DataStoreService>> {
        match self {
            Service::DataStore(s) => Some(s),
            _ => None,
        }
    }

    /// The messaging service, if that is what this is.
    pub fn as_messaging(&self) -> Option<&Arc<MessagingService>> {
        match self {
            Service::Messaging(s) => Some(s),
            _ => None,
        }
    }

    /// The place service, if that is what this is.
    pub fn as_place(&self) -> Option<&Arc<PlaceService>> {
        match self {
            Service::Place(s) => Some(s),
            _ => None,
        }
    }

    /// The asset service, if that is what this is.
    pub fn as_asset(&self) -> Option<&Arc<AssetService>> {
        match self {
            Service::Asset(s) => Some(s),
            _ => None,
        }
    }

    /// The group service, if that is what this is.
    pub fn as_group(&self) -> Option<&Arc<GroupService>> {
        match self {
            Service::Group(s) => Some(s),
            _ => None,
        }
    }

    /// True if both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Service) -> bool {
        match (self, other) {
            (Service::DataStore(a), Service::DataStore(b)) => Arc::ptr_eq(a, b),
            (Service::Messaging(a), Service::Messaging(b)) => Arc::ptr_eq(a, b),
            (Service::Place(a), Service::Place(b)) => Arc::ptr_eq(a, b),
            (Service::Asset(a), Service::Asset(b)) => Arc::ptr_eq(a, b),
            (Service::Group(a), Service::Group(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

type Factory = fn(ApiClient, ServiceArgs) -> Service;

fn factory(kind: ServiceKind) -> Factory {
    match kind {
        ServiceKind::DataStore => |client: ApiClient, args: ServiceArgs| {
            Service::DataStore(Arc::new(DataStoreService::new(client, args.id)))
        },
        ServiceKind::Messaging => |client: ApiClient, args: ServiceArgs| {
            Service::Messaging(Arc::new(MessagingService::new(client, args.id)))
        },
        ServiceKind::Place => |client: ApiClient, args: ServiceArgs| {
            Service::Place(Arc::new(PlaceService::new(client, args.id)))
        },
        ServiceKind::Asset => |client: ApiClient, args: ServiceArgs| {
            Service::Asset(Arc::new(AssetService::new(client, args.id, args.owner)))
        },
        ServiceKind::Group => |client: ApiClient, args: ServiceArgs| {
            Service::Group(Arc::new(GroupService::new(client, args.id)))
        },
    }
}

// ========== Registry ==========

static SHARED: LazyLock<RwLock<HashMap<String, ServiceRegistry>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn shared_slot(api_key: &ApiKey) -> String {
    content_md5(api_key.expose().as_bytes())
}

/// Thread-safe map from service name to constructed service.
#[derive(Clone)]
pub struct ServiceRegistry {
    client: ApiClient,
    services: Arc<RwLock<HashMap<String, Service>>>,
}

impl ServiceRegistry {
    /// Empty registry using the default configuration.
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self::with_client(ApiClient::new(api_key))
    }

    /// Empty registry using `config`.
    pub fn with_config(api_key: impl Into<ApiKey>, config: ClientConfig) -> Result<Self> {
        Ok(Self::with_client(ApiClient::with_config(api_key, config)?))
    }

    /// Empty registry whose services send through `client`.
    pub fn with_client(client: ApiClient) -> Self {
        Self {
            client,
            services: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Process-wide registry for `api_key`.
    ///
    /// Created on first use with the default configuration; later calls with
    /// the same key return a handle to the same map. Entries are held by a
    /// digest of the key and live for the rest of the process.
    pub fn shared(api_key: impl Into<ApiKey>) -> Self {
        let api_key = api_key.into();
        let slot = shared_slot(&api_key);

        if let Some(registry) = SHARED.read().get(&slot) {
            return registry.clone();
        }

        SHARED
            .write()
            .entry(slot)
            .or_insert_with(|| ServiceRegistry::new(api_key.clone()))
            .clone()
    }

    /// Construct the service family `name` from `args`, store it under
    /// `name`, and return it. Replaces any earlier entry.
    pub fn register(&self, name: &str, args: ServiceArgs) -> Result<Service> {
        let kind: ServiceKind = name.parse()?;
        let service = factory(kind)(self.client.clone(), args);

        self.services
            .write()
            .insert(kind.as_str().to_string(), service.clone());

        tracing::debug!("registered {} for id {}", kind, args.id);
        Ok(service)
    }

    /// The service stored under `name`.
    pub fn get(&self, name: &str) -> Result<Service> {
        self.services
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| CloudError::NotRegistered(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// True if both handles share one map.
    pub fn ptr_eq(&self, other: &ServiceRegistry) -> bool {
        Arc::ptr_eq(&self.services, &other.services)
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names())
            .finish_non_exhaustive()
    }
}
