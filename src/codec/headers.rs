//! Header multimap ⇄ wire representation.
//!
//! The envelope carries one string per header name, so every value
//! accumulated under a name is joined here and nowhere else.

use std::collections::BTreeMap;

use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::codec::cookie::{encode_set_cookie, Cookie};
use crate::error::DecodingError;

/// Separator between values of one header name on the wire.
pub const VALUE_SEPARATOR: &str = ", ";

/// Join values in order with [`VALUE_SEPARATOR`].
pub fn join_values<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            joined.push_str(VALUE_SEPARATOR);
        }
        joined.push_str(value.as_ref());
    }
    joined
}

/// Build a header multimap from wire pairs.
///
/// Flat and pre-joined values are both accepted as-is; repeated names
/// accumulate in order.
pub fn decode_headers<'a, I>(wire: I) -> Result<HeaderMap, DecodingError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in wire {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| DecodingError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| DecodingError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}

/// Flatten a header multimap into one string per (canonical) name.
pub fn encode_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut wire = BTreeMap::new();
    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()));
        wire.insert(canonical_header_name(name.as_str()), join_values(values));
    }
    wire
}

/// [`encode_headers`] plus cookie renderings appended to `Set-Cookie`.
pub fn encode_response_headers(headers: &HeaderMap, cookies: &[Cookie]) -> BTreeMap<String, String> {
    let mut wire = encode_headers(headers);
    if cookies.is_empty() {
        return wire;
    }

    let rendered = encode_set_cookie(cookies);
    let key = canonical_header_name(SET_COOKIE.as_str());
    let merged = match wire.remove(&key) {
        Some(existing) => join_values([existing, rendered]),
        None => rendered,
    };
    wire.insert(key, merged);
    wire
}

/// Render a header name in Train-Case: `x-custom-header` → `X-Custom-Header`.
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}
