//! Header and cookie codec.
//!
//! Pure conversions between the semantic forms handlers work with and the
//! string forms the proxy envelope carries.
//!
//! # Design Decisions
//! - Every multi-value join happens in `headers::join_values`
//! - Encoding is append-only; nothing written is parsed again
//! - Decoding is strict and reports a `DecodingError` instead of guessing

pub mod cookie;
pub mod headers;
pub mod query;

pub use cookie::{encode_set_cookie, parse_cookie_header, Cookie};
pub use headers::{
    canonical_header_name, decode_headers, encode_headers, encode_response_headers, join_values,
    VALUE_SEPARATOR,
};
pub use query::{decode_query, QueryParams};
