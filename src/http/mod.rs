//! In-memory HTTP emulation.
//!
//! # Data Flow
//! ```text
//! ProxyRequest
//!     → request.rs (SyntheticRequest: decode, strip paths, attributes)
//!     → http::Request<Body> dispatched by the router
//!     → response.rs (SyntheticResponse: status, headers, cookies, body)
//!     → Completion fires with the final ResponseSnapshot
//! ```
//!
//! `cookies.rs` provides the `CookieJar` extractor handlers use to set
//! response cookies.

pub mod cookies;
pub mod request;
pub mod response;

pub use cookies::CookieJar;
pub use request::SyntheticRequest;
pub use response::{Completion, ResponseSnapshot, SyntheticResponse};
