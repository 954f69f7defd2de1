//! Entry metadata header encoding and decoding.
//!
//! Data store entries carry their metadata out of band, in six fixed response
//! headers. Writes send the caller-assigned subset of the same headers.
//!
//! | Header | Format | Field |
//! |--------|--------|-------|
//! | `roblox-entry-created-time` | Timestamp | [`EntryMetadata::created_time`] |
//! | `last-modified` | Timestamp | [`EntryMetadata::last_modified`] |
//! | `roblox-entry-version` | Opaque string | [`EntryMetadata::version`] |
//! | `roblox-entry-attributes` | JSON value | [`EntryMetadata::attributes`] |
//! | `roblox-entry-userids` | JSON array of integers | [`EntryMetadata::user_ids`] |
//! | `content-md5` | Base64 digest | [`EntryMetadata::content_md5`] |
//!
//! # Examples
//!
//! ```
//! use opencloud_http::protocol::{decode_metadata_headers, encode_metadata_headers};
//! use opencloud_http::EntryMetadata;
//! use serde_json::json;
//!
//! let meta = EntryMetadata::new()
//!     .with_attributes(json!({"tier": "gold"}))
//!     .with_user_ids(vec![1, 2]);
//!
//! let mut headers = http::HeaderMap::new();
//! for (name, value) in encode_metadata_headers(&meta).unwrap() {
//!     headers.insert(name, value.parse().unwrap());
//! }
//! assert_eq!(decode_metadata_headers(&headers).unwrap(), meta);
//! ```

use crate::error::{CloudError, Result};
use crate::protocol::constants::headers;
use crate::types::EntryMetadata;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use http::{HeaderMap, HeaderName};
use md5::{Digest, Md5};
use serde::Serialize;

/// Format a timestamp in the canonical wire form.
///
/// RFC 3339 with millisecond precision and a `Z` suffix, e.g.
/// `2024-03-01T12:00:00.000Z`.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp header value.
///
/// Accepts RFC 3339 (any precision, any offset) and falls back to the
/// RFC 2822 / HTTP-date form used by `last-modified`.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| CloudError::HeaderParse(format!("Invalid timestamp: {}", value)))
}

/// Base64 MD5 digest of a serialized body, as sent in `content-md5`.
pub fn content_md5(body: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(Md5::digest(body))
}

/// Serialize `value` as JSON using only visible ASCII.
///
/// Characters from DEL upward are written as `\uXXXX` escapes (surrogate
/// pairs above the BMP), so the result is a valid header value and parses back
/// to the same JSON.
fn ascii_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    if json.is_ascii() && !json.contains('\u{7f}') {
        return Ok(json);
    }

    let mut out = String::with_capacity(json.len() + 16);
    let mut units = [0u16; 2];
    for c in json.chars() {
        if (c as u32) < 0x7f {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(out)
}

/// Encode metadata into header pairs.
///
/// Only fields that are present produce a header. Attributes and user ids are
/// JSON-serialized with non-ASCII escaped; timestamps use [`format_timestamp`].
pub fn encode_metadata_headers(meta: &EntryMetadata) -> Result<Vec<(HeaderName, String)>> {
    let mut out = Vec::new();

    if let Some(created) = &meta.created_time {
        out.push((headers::ENTRY_CREATED_TIME, format_timestamp(created)));
    }
    if let Some(modified) = &meta.last_modified {
        out.push((headers::LAST_MODIFIED, format_timestamp(modified)));
    }
    if let Some(version) = &meta.version {
        out.push((headers::ENTRY_VERSION, version.clone()));
    }
    if let Some(attributes) = &meta.attributes {
        out.push((headers::ENTRY_ATTRIBUTES, ascii_json(attributes)?));
    }
    if let Some(user_ids) = &meta.user_ids {
        out.push((headers::ENTRY_USER_IDS, ascii_json(user_ids)?));
    }
    if let Some(md5) = &meta.content_md5 {
        out.push((headers::CONTENT_MD5, md5.clone()));
    }

    Ok(out)
}

/// Decode metadata from response headers.
///
/// Headers missing from the response stay `None`. A present header with a
/// malformed value fails the whole decode. Values are read as UTF-8, so raw
/// non-ASCII JSON is accepted as well as `\uXXXX` escapes.
pub fn decode_metadata_headers(map: &HeaderMap) -> Result<EntryMetadata> {
    let mut meta = EntryMetadata::default();

    for name in headers::METADATA.iter() {
        let Some(raw) = map.get(name) else {
            continue;
        };
        let value = std::str::from_utf8(raw.as_bytes())
            .map_err(|_| CloudError::HeaderParse(format!("Invalid UTF-8 in {}", name)))?;

        if *name == headers::ENTRY_CREATED_TIME {
            meta.created_time = Some(parse_timestamp(value)?);
        } else if *name == headers::LAST_MODIFIED {
            meta.last_modified = Some(parse_timestamp(value)?);
        } else if *name == headers::ENTRY_VERSION {
            meta.version = Some(value.to_string());
        } else if *name == headers::ENTRY_ATTRIBUTES {
            meta.attributes = Some(serde_json::from_str(value)?);
        } else if *name == headers::ENTRY_USER_IDS {
            meta.user_ids = Some(serde_json::from_str(value)?);
        } else if *name == headers::CONTENT_MD5 {
            meta.content_md5 = Some(value.to_string());
        }
    }

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn to_map(pairs: Vec<(HeaderName, String)>) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name, value.parse().unwrap());
        }
        map
    }

    #[test]
    fn test_format_timestamp_millis() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&t), "2024-03-01T12:00:00.000Z");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
        assert_eq!(parse_timestamp("2015-10-21T07:28:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2015-10-21T09:28:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("Wed, 21 Oct 2015 07:28:00 GMT").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_content_md5_known_value() {
        assert_eq!(content_md5(b""), "1B2M2Y8AsgTpgAmY7PhCfg==");
        assert_eq!(content_md5(b"{\"v\":1}"), content_md5(b"{\"v\":1}"));
        assert_ne!(content_md5(b"1"), content_md5(b"2"));
    }

    #[test]
    fn test_encode_skips_absent_fields() {
        let meta = EntryMetadata::new().with_user_ids(vec![7]);
        let pairs = encode_metadata_headers(&meta).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, headers::ENTRY_USER_IDS);
        assert_eq!(pairs[0].1, "[7]");
    }

    #[test]
    fn test_encode_empty_metadata() {
        assert!(encode_metadata_headers(&EntryMetadata::default()).unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_full_metadata() {
        let meta = EntryMetadata {
            created_time: Some(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap()),
            last_modified: Some(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()),
            version: Some("08DA1E8AF6C4D1F6.0000000002.08DA1E8AF6C4D1F6.01".into()),
            attributes: Some(json!({"nested": {"list": [1, "two", null]}})),
            user_ids: Some(vec![1, 22, 333]),
            content_md5: Some("ZGVhZGJlZWY=".into()),
        };
        let decoded = decode_metadata_headers(&to_map(encode_metadata_headers(&meta).unwrap())).unwrap();
        assert_eq!(decoded, meta);
    }

    #[test]
    fn test_decode_ignores_unknown_headers() {
        let mut map = HeaderMap::new();
        map.insert("content-type", "application/json".parse().unwrap());
        map.insert(headers::ENTRY_VERSION, "v1".parse().unwrap());
        let meta = decode_metadata_headers(&map).unwrap();
        assert_eq!(meta.version.as_deref(), Some("v1"));
        assert!(meta.attributes.is_none());
        assert!(meta.created_time.is_none());
    }

    #[test]
    fn test_decode_malformed_json_fails() {
        let mut map = HeaderMap::new();
        map.insert(headers::ENTRY_ATTRIBUTES, "{not json".parse().unwrap());
        let err = decode_metadata_headers(&map).unwrap_err();
        assert!(matches!(err, CloudError::Json(_)));
    }

    #[test]
    fn test_decode_malformed_timestamp_fails() {
        let mut map = HeaderMap::new();
        map.insert(headers::ENTRY_CREATED_TIME, "not a date".parse().unwrap());
        assert!(matches!(
            decode_metadata_headers(&map),
            Err(CloudError::HeaderParse(_))
        ));
    }

    #[test]
    fn test_decode_empty_version_is_present() {
        let mut map = HeaderMap::new();
        map.insert(headers::ENTRY_VERSION, "".parse().unwrap());
        let meta = decode_metadata_headers(&map).unwrap();
        assert_eq!(meta.version.as_deref(), Some(""));
    }

    #[test]
    fn test_roundtrip_non_ascii_attributes() {
        let meta = EntryMetadata::new().with_attributes(json!({"name": "José"}));
        let pairs = encode_metadata_headers(&meta).unwrap();
        assert_eq!(pairs[0].1, r#"{"name":"Jos\u00e9"}"#);
        assert!(pairs[0].1.is_ascii());

        let decoded = decode_metadata_headers(&to_map(pairs)).unwrap();
        assert_eq!(decoded, meta);
    }

    #[test]
    fn test_roundtrip_header_hostile_attributes() {
        let meta = EntryMetadata::new()
            .with_attributes(json!({
                "quote": "say \"hi\"",
                "lines": "a\r\nb",
                "del": "\u{7f}",
                "emoji": "🎮",
                "cjk": "日本",
            }))
            .with_user_ids(vec![u64::MAX, 0]);

        let pairs = encode_metadata_headers(&meta).unwrap();
        for (name, value) in &pairs {
            assert!(
                value.bytes().all(|b| (0x20..0x7f).contains(&b)),
                "{} is not visible ASCII: {}",
                name,
                value
            );
        }
        assert!(pairs[0].1.contains(r"\ud83c\udfae"));

        let decoded = decode_metadata_headers(&to_map(pairs)).unwrap();
        assert_eq!(decoded, meta);
    }

    #[test]
    fn test_decode_raw_utf8_header() {
        let mut map = HeaderMap::new();
        map.insert(
            headers::ENTRY_ATTRIBUTES,
            http::HeaderValue::from_bytes("{\"name\":\"José\"}".as_bytes()).unwrap(),
        );
        let meta = decode_metadata_headers(&map).unwrap();
        assert_eq!(meta.attributes, Some(json!({"name": "José"})));
    }

    #[test]
    fn test_decode_invalid_utf8_fails() {
        let mut map = HeaderMap::new();
        map.insert(
            headers::ENTRY_VERSION,
            http::HeaderValue::from_bytes(&[b'v', 0xff]).unwrap(),
        );
        assert!(matches!(
            decode_metadata_headers(&map),
            Err(CloudError::HeaderParse(_))
        ));
    }
}
