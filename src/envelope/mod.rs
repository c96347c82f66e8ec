//! Proxy event envelope.
//!
//! # Data Flow
//! ```text
//! outer entrypoint (JSON bytes)
//!     → ProxyRequest (serde)
//!     → [container handler]
//!     → ProxyResponse (serde)
//!     → outer entrypoint
//! ```
//!
//! # Design Decisions
//! - Field names follow the gateway's camelCase wire names
//! - Single-value and multi-value header/query maps are both accepted;
//!   multi-value entries win for a name present in both

pub mod multimap;
pub mod request;
pub mod response;

pub use multimap::Multimap;
pub use request::{Identity, ProxyRequest, ProxyRequestBuilder, RequestContext};
pub use response::ProxyResponse;
