//! Synthetic response sink.
//!
//! # Responsibilities
//! - Capture status, headers, cookies and body the router produces
//! - Signal completion exactly once with the final state
//!
//! # Design Decisions
//! - `close`/`fail` consume the sink, so the signal cannot fire twice
//! - The waiting side only ever sees a finished `ResponseSnapshot`; there is
//!   no way to read a partial response
//! - A sink dropped without `close` (handler panic) resolves as a fault

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use bytes::{Bytes, BytesMut};
use tokio::sync::oneshot;

use crate::codec::Cookie;
use crate::error::ProxyError;

/// Final state of a completed response.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub cookies: Vec<Cookie>,
    pub body: Bytes,
}

impl ResponseSnapshot {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

/// In-memory response writer; no socket behind it.
#[derive(Debug)]
pub struct SyntheticResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    cookies: Vec<Cookie>,
    body: BytesMut,
    done: oneshot::Sender<Result<ResponseSnapshot, ProxyError>>,
}

/// Receiving half of the completion signal.
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<Result<ResponseSnapshot, ProxyError>>,
}

impl SyntheticResponse {
    pub fn new() -> (Self, Completion) {
        let (done, rx) = oneshot::channel();
        let response = Self {
            status: None,
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            body: BytesMut::new(),
            done,
        };
        (response, Completion { rx })
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Current status; 200 until set.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Append a header value. Existing values for the name are kept.
    pub fn add_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn add_cookie(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Append a chunk of body bytes.
    pub fn write(&mut self, chunk: impl AsRef<[u8]>) {
        self.body.extend_from_slice(chunk.as_ref());
    }

    pub fn write_str(&mut self, text: &str) {
        self.write(text.as_bytes());
    }

    /// Bytes written so far.
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Mark the response complete and hand its final state to the waiter.
    pub fn close(self) {
        let snapshot = ResponseSnapshot {
            status: self.status.unwrap_or(StatusCode::OK),
            headers: self.headers,
            cookies: self.cookies,
            body: self.body.freeze(),
        };
        // The waiter is gone only if the invocation itself was abandoned.
        let _ = self.done.send(Ok(snapshot));
    }

    /// Force the terminal fault state: 500, empty body.
    pub fn fail(self, reason: impl Into<String>) {
        self.reject(ProxyError::HandlerFault(reason.into()));
    }

    /// Discard what was written and complete with `err` instead.
    pub fn reject(self, err: ProxyError) {
        let _ = self.done.send(Err(err));
    }
}

impl Completion {
    /// Wait for the response to finish. Fires at most once.
    pub async fn wait(self) -> Result<ResponseSnapshot, ProxyError> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(ProxyError::HandlerFault(
                "response dropped before completion".to_string(),
            )),
        }
    }
}
