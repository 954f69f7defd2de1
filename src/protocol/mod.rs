//! Open Cloud wire protocol: constants, header codec and query codec.
//!
//! This module is independent of any transport. It turns typed values into
//! the exact strings the Open Cloud API expects and back.
//!
//! # Wire shapes
//!
//! | Concern | Format | Example |
//! |---------|--------|---------|
//! | Entry timestamps | RFC 3339, milliseconds, `Z` | `2024-01-01T00:00:00.000Z` |
//! | Entry attributes | JSON in a header | `{"tier":"gold"}` |
//! | Entry user ids | JSON array in a header | `[1,2,3]` |
//! | Content hash | base64 MD5 of the body | `1B2M2Y8AsgTpgAmY7PhCfg==` |
//! | Query strings | `?k=v&k2=v2`, RFC 3986 escaped | `?datastoreName=Player%20Data` |
//!
//! # Examples
//!
//! ```
//! use opencloud_http::protocol::{encode_query, QueryEncoding, QueryParams};
//!
//! let params = QueryParams::new()
//!     .with("datastoreName", "Players")
//!     .with_opt("scope", None::<String>);
//! assert_eq!(encode_query(&params, QueryEncoding::Percent), "?datastoreName=Players");
//! ```

pub mod headers;
pub mod query;

pub use headers::{
    content_md5, decode_metadata_headers, encode_metadata_headers, format_timestamp,
    parse_timestamp,
};
pub use query::{encode_query, QueryEncoding, QueryParams};

/// Protocol constants.
pub mod constants {
    /// Default API origin.
    pub const DEFAULT_BASE_URL: &str = "https://apis.roblox.com";

    /// Header names used by the API.
    pub mod headers {
        use http::HeaderName;

        /// Credential header attached to every request.
        pub const API_KEY: HeaderName = HeaderName::from_static("x-api-key");
        /// Entry creation time.
        pub const ENTRY_CREATED_TIME: HeaderName =
            HeaderName::from_static("roblox-entry-created-time");
        /// Entry last modification time.
        pub const LAST_MODIFIED: HeaderName = HeaderName::from_static("last-modified");
        /// Entry version token.
        pub const ENTRY_VERSION: HeaderName = HeaderName::from_static("roblox-entry-version");
        /// Entry attributes, JSON encoded.
        pub const ENTRY_ATTRIBUTES: HeaderName =
            HeaderName::from_static("roblox-entry-attributes");
        /// Entry user ids, JSON encoded.
        pub const ENTRY_USER_IDS: HeaderName = HeaderName::from_static("roblox-entry-userids");
        /// Base64 MD5 digest of the body.
        pub const CONTENT_MD5: HeaderName = HeaderName::from_static("content-md5");

        /// The six entry metadata headers, in wire order.
        pub const METADATA: [HeaderName; 6] = [
            ENTRY_CREATED_TIME,
            LAST_MODIFIED,
            ENTRY_VERSION,
            ENTRY_ATTRIBUTES,
            ENTRY_USER_IDS,
            CONTENT_MD5,
        ];
    }

    /// Content types.
    pub mod content_types {
        /// JSON bodies.
        pub const JSON: &str = "application/json";
        /// Structured-text place files.
        pub const XML: &str = "application/xml";
        /// Binary place files.
        pub const OCTET_STREAM: &str = "application/octet-stream";
    }

    /// Multipart field names for asset uploads.
    pub mod multipart {
        /// JSON descriptor part.
        pub const REQUEST: &str = "request";
        /// Binary content part.
        pub const FILE_CONTENT: &str = "fileContent";
    }
}
