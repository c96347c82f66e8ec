//! Route registration.
//!
//! # Responsibilities
//! - Register (method, exact path) → handler
//! - Reject duplicate and malformed registrations before traffic
//! - Freeze into the router every invocation dispatches against
//!
//! # Design Decisions
//! - Errors are collected, not returned per call, so registration chains
//!   and reports every problem at `build`
//! - Path syntax is axum's (`/users/{id}`); matching is exact, not prefix
//! - Unmatched requests fall through to a 404 fallback, tagged with
//!   `ProxyError::NoRouteMatched` so the container can tell it apart from a
//!   handler's own 404
//! - axum's default body cap is lifted; the container enforces
//!   `max_body_size` before dispatch

use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use axum::extract::DefaultBodyLimit;
use axum::handler::Handler;
use axum::http::{Method, Uri};
use axum::routing::{on, MethodFilter};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::{InitializationError, ProxyError, RouteError};

/// Routes registered by the application.
#[derive(Debug, Default)]
pub struct RouteTable {
    router: Router,
    registered: HashSet<(Method, String)>,
    errors: Vec<RouteError>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` on `path`.
    pub fn route<H, T>(mut self, method: Method, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        if !path.starts_with('/') {
            self.errors.push(RouteError::InvalidPath(path.to_string()));
            return self;
        }

        let filter = match MethodFilter::try_from(method.clone()) {
            Ok(filter) => filter,
            Err(_) => {
                self.errors.push(RouteError::UnsupportedMethod {
                    method: method.to_string(),
                    path: path.to_string(),
                });
                return self;
            }
        };

        if !self.registered.insert((method.clone(), path.to_string())) {
            self.errors.push(RouteError::Duplicate {
                method: method.to_string(),
                path: path.to_string(),
            });
            return self;
        }

        // axum panics on paths its matcher cannot accept (conflicting
        // captures, bad wildcards); surface that as a registration error.
        let router = std::mem::take(&mut self.router);
        match catch_unwind(AssertUnwindSafe(move || router.route(path, on(filter, handler)))) {
            Ok(router) => {
                self.router = router;
                tracing::debug!(%method, path, "Route registered");
            }
            Err(payload) => self.errors.push(RouteError::Rejected {
                path: path.to_string(),
                reason: panic_message(payload.as_ref()),
            }),
        }
        self
    }

    pub fn get<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::GET, path, handler)
    }

    pub fn post<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::POST, path, handler)
    }

    pub fn put<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::PUT, path, handler)
    }

    pub fn patch<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::PATCH, path, handler)
    }

    pub fn delete<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::DELETE, path, handler)
    }

    /// Number of accepted registrations.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Freeze the table into a router, or report every rejected route.
    pub fn build(self) -> Result<Router, InitializationError> {
        if !self.errors.is_empty() {
            return Err(InitializationError::Registration(self.errors));
        }
        if self.registered.is_empty() {
            tracing::warn!("Route table is empty; every request will 404");
        }

        tracing::info!(routes = self.registered.len(), "Route table registered");
        Ok(self
            .router
            .fallback(no_route)
            .layer(DefaultBodyLimit::disable())
            .layer(TraceLayer::new_for_http()))
    }
}

async fn no_route(method: Method, uri: Uri) -> ProxyError {
    tracing::debug!(%method, path = uri.path(), "No route matched");
    ProxyError::NoRouteMatched {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "router rejected the path".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok() -> &'static str {
        "ok"
    }

    #[test]
    fn accepts_distinct_routes() {
        let table = RouteTable::new()
            .get("/", ok)
            .get("/hello", ok)
            .post("/hello", ok)
            .delete("/items/{id}", ok);
        assert_eq!(table.len(), 4);
        assert!(table.build().is_ok());
    }

    #[test]
    fn collects_every_registration_error() {
        let err = RouteTable::new()
            .get("/hello", ok)
            .get("/hello", ok)
            .get("hello", ok)
            .route(Method::from_bytes(b"PURGE").unwrap(), "/cache", ok)
            .build()
            .unwrap_err();

        match err {
            InitializationError::Registration(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(matches!(errors[0], RouteError::Duplicate { .. }));
                assert!(matches!(errors[1], RouteError::InvalidPath(_)));
                assert!(matches!(errors[2], RouteError::UnsupportedMethod { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn conflicting_captures_are_rejected() {
        let err = RouteTable::new()
            .get("/users/{id}", ok)
            .put("/users/{name}", ok)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            InitializationError::Registration(ref errors)
                if matches!(errors[0], RouteError::Rejected { .. })
        ));
    }

    #[test]
    fn empty_table_still_builds() {
        assert!(RouteTable::new().is_empty());
        assert!(RouteTable::new().build().is_ok());
    }
}
