//! Container handler subsystem.
//!
//! # Data Flow
//! ```text
//! ProxyRequest + ContextMetadata
//!     → handler.rs (decode, attach context, spawn dispatch)
//!     → dispatch.rs (Router::oneshot, drain body into SyntheticResponse)
//!     → handler.rs (await completion, encode)
//!     → ProxyResponse
//! ```
//!
//! # Design Decisions
//! - Dispatch runs on its own task; a handler panic drops the response sink
//!   and surfaces as a 500 instead of unwinding into the caller
//! - The caller waits for completion without a timeout; the platform's
//!   deadline is the only bound
//! - Concurrent invocations share the frozen router and nothing else

mod dispatch;
pub mod handler;

pub use handler::ContainerHandler;
