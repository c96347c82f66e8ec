//! Proxy Container Library
//!
//! Runs an axum router in-process behind an API-gateway proxy event
//! interface: events become synthetic requests, routed handlers write
//! synthetic responses, and those are encoded back into proxy responses.

pub mod codec;
pub mod config;
pub mod container;
pub mod envelope;
pub mod error;
pub mod http;
pub mod invocation;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ContainerConfig;
pub use container::ContainerHandler;
pub use envelope::{ProxyRequest, ProxyResponse};
pub use error::{DecodingError, InitializationError, ProxyError, RouteError};
pub use http::CookieJar;
pub use invocation::{ContextMetadata, InvocationContext};
pub use lifecycle::{get_handler, get_handler_with_config, HandlerCell};
pub use routing::RouteTable;
