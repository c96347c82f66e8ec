//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Cold start (init.rs):
//!     first get_handler → register routes → validate config → freeze router
//!     → handler published to every caller
//!
//! Warm invocations:
//!     get_handler → already published → same handler
//! ```
//!
//! # Design Decisions
//! - Initialization runs at most once per successful outcome
//! - A failed initialization publishes nothing; the next call retries
//! - Concurrent first callers wait for the one running initializer

pub mod init;

pub use init::{get_handler, get_handler_with_config, HandlerCell};
