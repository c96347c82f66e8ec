//! Dispatch worker: runs one request through the router and drains the
//! response into the synthetic sink.

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::error::ProxyError;
use crate::http::{CookieJar, SyntheticResponse};

/// Drive `request` through `router`, writing everything into `response`.
///
/// Runs on its own task. Completion fires when the body stream ends; a
/// panic anywhere in here drops `response`, which the waiter sees as a fault.
pub(crate) async fn dispatch(
    router: Router,
    request: Request<Body>,
    jar: CookieJar,
    mut response: SyntheticResponse,
) {
    let reply = match router.oneshot(request).await {
        Ok(reply) => reply,
        Err(never) => match never {},
    };

    let (parts, mut body) = reply.into_parts();
    if let Some(err) = parts.extensions.get::<ProxyError>() {
        response.reject(err.clone());
        return;
    }

    response.set_status(parts.status);
    for (name, value) in parts.headers.iter() {
        response.add_header(name.clone(), value.clone());
    }

    while let Some(frame) = body.frame().await {
        match frame {
            Ok(frame) => {
                // Trailers have no place in the envelope.
                if let Ok(data) = frame.into_data() {
                    response.write(data);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, written = response.body_len(), "Response body stream failed");
                response.fail(format!("body stream failed: {e}"));
                return;
            }
        }
    }

    for cookie in jar.take() {
        response.add_cookie(cookie);
    }

    tracing::trace!(status = %response.status(), bytes = response.body_len(), "Response complete");
    response.close();
}
