//! Synthetic request built from a proxy event.
//!
//! # Responsibilities
//! - Validate method, headers, query and body of the event
//! - Resolve the routable path (stage and base path stripped)
//! - Carry a per-invocation attribute store
//! - Produce the `http::Request` the router dispatches
//!
//! # Design Decisions
//! - Every decoding failure is a `DecodingError`; nothing panics on input
//! - Attributes are `http::Extensions`, so they travel into the router as
//!   request extensions and die with the request

use std::net::{IpAddr, SocketAddr};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap, Method, Request, Uri};
use base64::{engine::general_purpose, Engine};
use bytes::Bytes;

use crate::codec::{decode_headers, decode_query, QueryParams};
use crate::config::ContainerConfig;
use crate::envelope::{ProxyRequest, RequestContext};
use crate::error::DecodingError;

/// In-memory stand-in for a request read off a live connection.
#[derive(Debug)]
pub struct SyntheticRequest {
    method: Method,
    path: String,
    query: QueryParams,
    headers: HeaderMap,
    body: Bytes,
    attributes: Extensions,
}

impl SyntheticRequest {
    /// Decode one proxy event.
    pub fn from_proxy(event: &ProxyRequest, config: &ContainerConfig) -> Result<Self, DecodingError> {
        let method = Method::from_bytes(event.http_method.to_ascii_uppercase().as_bytes())
            .map_err(|_| DecodingError::InvalidMethod(event.http_method.clone()))?;

        let path = resolve_path(
            &event.path,
            event.request_context.stage.as_deref(),
            config,
        )?;
        let query = decode_query(event.query_pairs())?;
        let headers = decode_headers(event.header_pairs())?;
        let body = decode_body(event, config.max_body_size)?;

        let mut attributes = Extensions::new();
        attributes.insert(event.request_context.clone());
        if let Some(ip) = source_ip(&event.request_context) {
            attributes.insert(ConnectInfo(SocketAddr::new(ip, 0)));
        }

        Ok(Self {
            method,
            path,
            query,
            headers,
            body,
            attributes,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Routable path, after stage and base path stripping.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if it is visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text, if it is text.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn attributes(&self) -> &Extensions {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Extensions {
        &mut self.attributes
    }

    /// Store a typed attribute, returning the previous value of that type.
    pub fn insert_attribute<T>(&mut self, value: T) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.attributes.insert(value)
    }

    pub fn attribute<T>(&self) -> Option<&T>
    where
        T: Send + Sync + 'static,
    {
        self.attributes.get::<T>()
    }

    /// Path and re-encoded query as a request target.
    pub fn uri(&self) -> Result<Uri, DecodingError> {
        let target = if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query.to_query_string())
        };
        target
            .parse::<Uri>()
            .map_err(|_| DecodingError::InvalidPath(self.path.clone()))
    }

    /// Hand the request over to the router.
    pub fn into_http_request(self) -> Result<Request<Body>, DecodingError> {
        let uri = self.uri()?;
        let mut request = Request::new(Body::from(self.body));
        *request.method_mut() = self.method;
        *request.uri_mut() = uri;
        *request.headers_mut() = self.headers;
        *request.extensions_mut() = self.attributes;
        Ok(request)
    }
}

/// Strip the stage and base path, then percent-encode what a URI cannot hold.
fn resolve_path(
    raw: &str,
    stage: Option<&str>,
    config: &ContainerConfig,
) -> Result<String, DecodingError> {
    if !raw.starts_with('/') {
        return Err(DecodingError::InvalidPath(raw.to_string()));
    }

    let mut path = raw;
    if config.use_stage_as_base_path {
        if let Some(stage) = stage.filter(|s| !s.is_empty()) {
            path = strip_segment_prefix(path, &format!("/{stage}"));
        }
    }
    if config.strip_base_path {
        if let Some(base) = config.base_path.as_deref().filter(|b| *b != "/") {
            path = strip_segment_prefix(path, base);
        }
    }
    let path = if path.is_empty() { "/" } else { path };

    // The url crate percent-encodes characters a path may not carry raw.
    let mut url = url::Url::parse("http://localhost/")
        .map_err(|_| DecodingError::InvalidPath(raw.to_string()))?;
    url.set_path(path);
    Ok(url.path().to_string())
}

/// Remove `prefix` only when it ends at a segment boundary.
fn strip_segment_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

fn decode_body(event: &ProxyRequest, limit: usize) -> Result<Bytes, DecodingError> {
    let body = match event.body.as_deref() {
        None | Some("") => return Ok(Bytes::new()),
        Some(body) if event.is_base64_encoded => general_purpose::STANDARD
            .decode(body)
            .map(Bytes::from)
            .map_err(|e| DecodingError::InvalidBase64(e.to_string()))?,
        Some(body) => Bytes::copy_from_slice(body.as_bytes()),
    };

    if body.len() > limit {
        return Err(DecodingError::BodyTooLarge {
            size: body.len(),
            limit,
        });
    }
    Ok(body)
}

fn source_ip(context: &RequestContext) -> Option<IpAddr> {
    context.identity.source_ip.as_deref()?.parse().ok()
}
