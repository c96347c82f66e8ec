//! Error taxonomy for the container.
//!
//! # Propagation
//! - `InitializationError` is the only error that reaches a caller as `Err`,
//!   and only from the initialization guard, before any traffic.
//! - Every per-request error (`ProxyError`) is converted into a
//!   `ProxyResponse` whose status code carries the failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::loader::ConfigError;

/// The proxy event could not be turned into a synthetic request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    #[error("invalid request path {0:?}")]
    InvalidPath(String),

    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("malformed query parameter {key:?}: {reason}")]
    MalformedQuery { key: String, reason: String },

    #[error("body is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("body of {size} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { size: usize, limit: usize },
}

impl DecodingError {
    /// Status code reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            DecodingError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodingError::InvalidMethod(_) => "method",
            DecodingError::InvalidPath(_) => "path",
            DecodingError::InvalidHeader { .. } => "header",
            DecodingError::MalformedQuery { .. } => "query",
            DecodingError::InvalidBase64(_) => "base64",
            DecodingError::BodyTooLarge { .. } => "body_size",
        }
    }
}

/// Per-invocation failure. Never escapes the container handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("bad request: {0}")]
    Decoding(#[from] DecodingError),

    /// The matched handler panicked or its body stream failed.
    #[error("handler fault: {0}")]
    HandlerFault(String),

    #[error("no route matched {method} {path}")]
    NoRouteMatched { method: String, path: String },
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Decoding(e) => e.status(),
            ProxyError::HandlerFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::NoRouteMatched { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ProxyError {
    /// The error itself rides along as a response extension, so whoever
    /// drains the response can report it as the error it is.
    fn into_response(self) -> Response {
        let mut response = match &self {
            ProxyError::Decoding(e) => (e.status(), e.to_string()).into_response(),
            other => other.status().into_response(),
        };
        response.extensions_mut().insert(self);
        response
    }
}

/// A single rejected route registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("duplicate route {method} {path}")]
    Duplicate { method: String, path: String },

    #[error("route path {0:?} must start with '/'")]
    InvalidPath(String),

    #[error("method {method} is not routable ({path})")]
    UnsupportedMethod { method: String, path: String },

    #[error("router rejected {path}: {reason}")]
    Rejected { path: String, reason: String },
}

/// Route table registration or framework startup failed.
///
/// The guard stays uninitialized; a later call may retry.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("route registration failed: {}", describe(.0))]
    Registration(Vec<RouteError>),

    #[error("framework startup failed: {0}")]
    Startup(String),

    #[error("invalid container configuration: {0}")]
    Config(#[from] ConfigError),
}

impl InitializationError {
    /// Wrap an application-side startup failure.
    pub fn startup(err: impl std::fmt::Display) -> Self {
        InitializationError::Startup(err.to_string())
    }
}

fn describe(errors: &[RouteError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_errors_map_to_client_statuses() {
        let err = DecodingError::InvalidBase64("bad".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = DecodingError::BodyTooLarge { size: 10, limit: 5 };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ProxyError::from(err).status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn registration_error_lists_every_route() {
        let err = InitializationError::Registration(vec![
            RouteError::InvalidPath("hello".into()),
            RouteError::Duplicate { method: "GET".into(), path: "/".into() },
        ]);
        let message = err.to_string();
        assert!(message.contains("\"hello\""));
        assert!(message.contains("duplicate route GET /"));
    }

    #[test]
    fn response_carries_the_error() {
        let err = ProxyError::NoRouteMatched {
            method: "GET".into(),
            path: "/missing".into(),
        };
        let response = err.clone().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.extensions().get::<ProxyError>(), Some(&err));
    }
}
