//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! container / routing / lifecycle produce:
//!     → logging.rs (structured tracing events, one span per invocation)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - The invocation request id is a span field, so every event inside one
//!   invocation carries it
//! - Metrics go through the `metrics` facade and cost nothing without a
//!   recorder

pub mod logging;
pub mod metrics;
