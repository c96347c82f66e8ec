//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (once, at initialization):
//!     RouteTable::get/post/route(...)
//!     → validate (path shape, method, duplicates)
//!     → build() freezes an axum Router + 404 fallback
//!
//! Per invocation:
//!     http::Request → Router (cloned Arc, no locking) → Response
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Exact-path matching; `/` and `/hello` are independent routes
//! - Explicit NoRouteMatched (404) rather than silent default

pub mod table;

pub use table::RouteTable;
