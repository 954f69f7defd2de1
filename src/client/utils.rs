//! Utility functions for the Open Cloud client.
//!
//! - Status code formatting for protocol errors
//! - Local validation of identifiers before a request is built
//! - Safe joining of server-supplied resource paths

use crate::error::{CloudError, Result};
use http::StatusCode;
use regex::Regex;
use std::sync::LazyLock;

static VERSION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]+$").expect("valid version id pattern"));

/// `type/subtype` followed by optional `; name=value` parameters, RFC 9110 tokens.
static MEDIA_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r##"^[A-Za-z0-9!#$%&'*+.^_`|~-]+/[A-Za-z0-9!#$%&'*+.^_`|~-]+(?:[ \t]*;[ \t]*[A-Za-z0-9!#$%&'*+.^_`|~-]+=(?:[A-Za-z0-9!#$%&'*+.^_`|~-]+|"[^"\\\r\n]*"))*$"##,
    )
    .expect("valid media type pattern")
});

/// Format `"<code> - <reason>"`, e.g. `"500 - Internal Server Error"`.
pub fn status_line(status: StatusCode) -> String {
    format!(
        "{} - {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

/// Check a version token before it is put on the wire.
///
/// Version tokens are server-assigned and opaque, but always made of ASCII
/// letters, digits, `.`, `_` and `-`.
pub fn validate_version_id(version_id: &str) -> Result<()> {
    if VERSION_ID.is_match(version_id) {
        Ok(())
    } else {
        Err(CloudError::InvalidParameter(format!(
            "malformed version token: {:?}",
            version_id
        )))
    }
}

/// Check a caller-supplied content type before it is put on the wire.
pub fn validate_content_type(content_type: &str) -> Result<()> {
    if MEDIA_TYPE.is_match(content_type) {
        Ok(())
    } else {
        Err(CloudError::InvalidParameter(format!(
            "malformed content type: {:?}",
            content_type
        )))
    }
}

/// Reject empty identifiers such as entry keys, topic names and data store names.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(CloudError::InvalidParameter(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

/// Join a server-supplied relative path onto `base`.
///
/// The result must stay under `base`; absolute URLs and `..` escapes are
/// rejected.
pub fn join_resource_path(base: &str, path: &str) -> Result<String> {
    let trimmed = path.trim_start_matches('/');
    require_non_empty("operation path", trimmed)?;

    let base_dir = format!("{}/", base.trim_end_matches('/'));
    let root = url::Url::parse(&base_dir)
        .map_err(|e| CloudError::InvalidParameter(format!("invalid base URL {}: {}", base, e)))?;
    let joined = root
        .join(trimmed)
        .map_err(|e| CloudError::InvalidParameter(format!("invalid path {}: {}", path, e)))?;

    if !joined.as_str().starts_with(root.as_str()) {
        return Err(CloudError::InvalidParameter(format!(
            "path escapes {}: {}",
            base, path
        )));
    }

    Ok(joined.to_string())
}
