//! Invocation context adapter.
//!
//! Wraps caller metadata (deadline, invocation id, function identity) into
//! the read-only `InvocationContext` handlers extract. Missing fields take
//! defaults; building a context never fails.

pub mod context;

pub use context::{ContextMetadata, InvocationContext};
