//! Query string encoding.
//!
//! [`QueryParams`] is an ordered list of `(key, Option<value>)` pairs. Absent
//! values are dropped at encode time; present values (including the empty
//! string) are emitted once each, in insertion order.

/// How query keys and values are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryEncoding {
    /// RFC 3986 percent-encoding of everything outside the unreserved set.
    #[default]
    Percent,
    /// Keys and values are written as-is.
    ///
    /// Reproduces the legacy unescaped form for servers or proxies that
    /// match on it. Reserved characters in values corrupt the query.
    Verbatim,
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a present value.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, Some(value.to_string()));
        self
    }

    /// Add a value that may be absent.
    pub fn with_opt<T: ToString>(mut self, key: impl Into<String>, value: Option<T>) -> Self {
        self.set(key, value.map(|v| v.to_string()));
        self
    }

    /// Set `key`, replacing an earlier value in place.
    ///
    /// A later `None` does not erase an earlier present value; it only
    /// reserves the slot when the key is new.
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => {
                if value.is_some() {
                    *slot = value;
                }
            }
            None => self.pairs.push((key, value)),
        }
    }

    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Present pairs in order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    /// True if no key has a present value.
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    /// Encode as a query string; see [`encode_query`].
    pub fn encode(&self, encoding: QueryEncoding) -> String {
        encode_query(self, encoding)
    }
}

/// Encode parameters as `?k=v&k2=v2`.
///
/// Returns the empty string when no key has a present value.
///
/// # Examples
///
/// ```
/// use opencloud_http::protocol::{encode_query, QueryEncoding, QueryParams};
///
/// let params = QueryParams::new()
///     .with("prefix", "a b")
///     .with("limit", 10);
/// assert_eq!(encode_query(&params, QueryEncoding::Percent), "?prefix=a%20b&limit=10");
/// assert_eq!(encode_query(&params, QueryEncoding::Verbatim), "?prefix=a b&limit=10");
/// assert_eq!(encode_query(&QueryParams::new(), QueryEncoding::Percent), "");
/// ```
pub fn encode_query(params: &QueryParams, encoding: QueryEncoding) -> String {
    let joined = params
        .present()
        .map(|(k, v)| match encoding {
            QueryEncoding::Percent => {
                format!("{}={}", urlencoding::encode(k), urlencoding::encode(v))
            }
            QueryEncoding::Verbatim => format!("{}={}", k, v),
        })
        .collect::<Vec<_>>()
        .join("&");

    if joined.is_empty() {
        String::new()
    } else {
        format!("?{}", joined)
    }
}
