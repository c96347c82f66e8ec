//! Query parameter decoding.
//!
//! Values arrive as an ordered multimap whose keys and values may still
//! carry percent escapes. Decoding is strict: a stray `%` or an escape that
//! does not produce UTF-8 is a malformed query, not a silently lossy one.

use url::form_urlencoded;

use crate::error::DecodingError;

/// Decoded query parameters; repeated keys keep their order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-encode as an `application/x-www-form-urlencoded` query string.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// Percent-decode every key and value.
///
/// Gateways usually hand over parameters already decoded, so this is a
/// second decoding pass: a decoded `50%` is rejected as malformed and a
/// client's `%2520` arrives as `%20` from the gateway and leaves here as a
/// space. Callers that receive raw parameters get exactly one pass.
pub fn decode_query<'a, I>(raw: I) -> Result<QueryParams, DecodingError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut params = Vec::new();
    for (key, value) in raw {
        let decoded_key = percent_decode(key).map_err(|reason| DecodingError::MalformedQuery {
            key: key.to_string(),
            reason,
        })?;
        let decoded_value =
            percent_decode(value).map_err(|reason| DecodingError::MalformedQuery {
                key: key.to_string(),
                reason,
            })?;
        params.push((decoded_key, decoded_value));
    }
    Ok(QueryParams(params))
}

fn percent_decode(input: &str) -> Result<String, String> {
    if !input.contains('%') {
        return Ok(input.to_string());
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| hex_value(*b));
            let lo = bytes.get(i + 2).and_then(|b| hex_value(*b));
            match (hi, lo) {
                (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                _ => return Err(format!("invalid percent escape at byte {i}")),
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| "escapes do not decode to UTF-8".to_string())
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
