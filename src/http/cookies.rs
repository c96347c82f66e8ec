//! Cookie jar extractor for handlers.

use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::codec::{parse_cookie_header, Cookie};

/// Request cookies plus the cookies a handler sets on its response.
///
/// Clones share the outbound list, so cookies added from a task that
/// outlives the handler still reach the response as long as they are added
/// before the body finishes.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    inbound: Arc<Vec<(String, String)>>,
    outbound: Arc<Mutex<Vec<Cookie>>>,
}

impl CookieJar {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let inbound = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(parse_cookie_header)
            .collect();
        Self {
            inbound: Arc::new(inbound),
            outbound: Arc::default(),
        }
    }

    /// Value of a cookie sent with the request.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inbound
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Queue a cookie for the response.
    pub fn add(&self, cookie: Cookie) {
        self.outbound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(cookie);
    }

    pub(crate) fn take(&self) -> Vec<Cookie> {
        std::mem::take(&mut *self.outbound.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<S> FromRequestParts<S> for CookieJar
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CookieJar>()
            .cloned()
            .unwrap_or_else(|| CookieJar::from_headers(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_every_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1; b=2"));
        headers.append(COOKIE, HeaderValue::from_static("c=3"));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(jar.get("b"), Some("2"));
        assert_eq!(jar.get("c"), Some("3"));
        assert_eq!(jar.get("d"), None);
    }

    #[test]
    fn clones_share_outbound_cookies() {
        let jar = CookieJar::default();
        let handle = jar.clone();
        handle.add(Cookie::new("a", "1"));
        handle.add(Cookie::new("b", "2"));

        let taken = jar.take();
        assert_eq!(taken.len(), 2);
        assert!(jar.take().is_empty());
    }
}
