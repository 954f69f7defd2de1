//! Resource clients for each Open Cloud API family.
//!
//! Every service is bound to one identity (a universe, owner or group id)
//! and an [`ApiClient`](crate::client::ApiClient). Services keep no per-call
//! state; each operation is exactly one request.
//!
//! | Service | Base path |
//! |---------|-----------|
//! | [`DataStoreService`] | `/datastores/v1/universes/{universeId}/standard-datastores` |
//! | [`MessagingService`] | `/messaging-service/v1/universes/{universeId}` |
//! | [`PlaceService`] | `/universes/v1/{universeId}` |
//! | [`AssetService`] | `/assets/v1` |
//! | [`GroupService`] | `/cloud/v2/groups/{groupId}` |
//!
//! [`ServiceRegistry`] constructs and caches services by name.

pub mod asset;
pub mod datastore;
pub mod group;
pub mod messaging;
pub mod place;
pub mod registry;

pub use asset::{
    AssetDescriptor, AssetOperation, AssetOwner, AssetService, AssetType, CreateAssetOptions,
};
pub use datastore::{
    DataStore, DataStoreInfo, DataStoreOptions, DataStoreService, Entry, EntryKey, EntryVersion,
    IncrementOptions, ListDataStoresOptions, ListDataStoresResponse, ListEntriesOptions,
    ListEntriesResponse, ListVersionsOptions, ListVersionsResponse, SetEntryOptions, SortOrder,
};
pub use group::{GroupService, MembersOptions, RolesOptions};
pub use messaging::{MessagingService, Topic};
pub use place::{FileType, Place, PlacePublishResponse, PlaceService, VersionType};
pub use registry::{Service, ServiceArgs, ServiceKind, ServiceRegistry};
