#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Module Structure
//!
//! - **[types]** - Request, response, payload and entry metadata types
//! - **[error]** - `CloudError` and result handling
//! - **[protocol]** - Query string and metadata header codecs, wire constants
//! - **[client]** - Request executor, transport seam, response normalizer
//! - **[services]** - Data store, messaging, place, asset and group clients, plus the registry
//! - **[cloud]** - `CloudClient`, the per-universe bundle

pub mod client;
pub mod cloud;
pub mod error;
pub mod protocol;
pub mod services;
pub mod types;

pub use client::{ApiClient, ApiKey, ClientConfig, ReqwestTransport, Transport};
pub use cloud::CloudClient;
pub use error::{CloudError, ErrorKind, Result};
pub use protocol::{QueryEncoding, QueryParams};
pub use services::{
    AssetService, DataStore, DataStoreService, GroupService, MessagingService, PlaceService,
    ServiceArgs, ServiceRegistry,
};
pub use types::{
    ApiRequest, ApiResponse, EntryMetadata, MultipartPart, Payload, RequestBody, WritePrecondition,
};

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;
