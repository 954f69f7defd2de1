//! The API key credential.

use std::fmt;
use std::sync::Arc;

/// Opaque API key.
///
/// Attached as the `x-api-key` header on every request and nowhere else. It
/// has no public accessor, is not `Serialize`, and `Debug` redacts it.
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    /// Wrap a secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Arc::from(secret.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl From<&str> for ApiKey {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for ApiKey {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}
