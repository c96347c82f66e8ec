//! Container handler: one proxy event in, one proxy response out.
//!
//! # Invocation cycle
//! ```text
//! DECODING            ProxyRequest → SyntheticRequest (+ InvocationContext, CookieJar)
//! DISPATCHING         spawn dispatch(router, request, SyntheticResponse)
//! AWAITING-COMPLETION Completion::wait (no timeout, no cancellation)
//! ENCODING            ResponseSnapshot → ProxyResponse via the codec
//! DONE                return
//! ```
//! Any error on the way becomes a `ProxyResponse`; callers never see `Err`.

use std::sync::OnceLock;
use std::time::Instant;

use axum::http::header::CONTENT_TYPE;
use axum::Router;
use base64::{engine::general_purpose, Engine};
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::Instrument;

use crate::codec::encode_response_headers;
use crate::config::{validate_config, ConfigError, ContainerConfig};
use crate::container::dispatch::dispatch;
use crate::envelope::{ProxyRequest, ProxyResponse};
use crate::error::{InitializationError, ProxyError};
use crate::http::{CookieJar, ResponseSnapshot, SyntheticRequest, SyntheticResponse};
use crate::invocation::{ContextMetadata, InvocationContext};
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Bridges proxy events to the registered routes.
pub struct ContainerHandler {
    router: Router,
    config: ContainerConfig,
    /// Runtime for the synchronous entry point, created on first use.
    runtime: OnceLock<Runtime>,
}

impl std::fmt::Debug for ContainerHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerHandler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContainerHandler {
    /// Validate `config` and freeze `routes`.
    pub fn new(routes: RouteTable, config: ContainerConfig) -> Result<Self, InitializationError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let router = routes.build()?;
        Ok(Self {
            router,
            config,
            runtime: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Synchronous entry point.
    ///
    /// Blocks the calling thread until the response is complete. On a thread
    /// with a current tokio runtime (blocking-pool threads included) it
    /// refuses with a 500; use [`ContainerHandler::handle`] there.
    pub fn proxy(&self, request: ProxyRequest, metadata: ContextMetadata) -> ProxyResponse {
        if Handle::try_current().is_ok() {
            tracing::error!(
                path = %request.path,
                "Synchronous proxy called inside an async runtime; use handle()"
            );
            return error_response(&ProxyError::HandlerFault(
                "proxy called inside an async runtime".to_string(),
            ));
        }

        match self.runtime() {
            Ok(runtime) => runtime.block_on(self.handle(request, metadata)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start container runtime");
                error_response(&ProxyError::HandlerFault(e.to_string()))
            }
        }
    }

    /// Asynchronous entry point.
    pub async fn handle(&self, request: ProxyRequest, metadata: ContextMetadata) -> ProxyResponse {
        let start = Instant::now();
        let context = InvocationContext::from_metadata(metadata);
        let method = metrics::method_label(&request.http_method);
        let span = tracing::info_span!(
            "invocation",
            request_id = %context.request_id(),
            method = %request.http_method,
            path = %request.path,
        );

        async move {
            let response = match self.invoke(request, context).await {
                Ok(snapshot) => self.encode(snapshot),
                Err(err) => {
                    match &err {
                        ProxyError::Decoding(e) => {
                            tracing::warn!(error = %e, "Rejected malformed proxy event");
                            if self.config.observability.metrics_enabled {
                                metrics::record_decode_error(e.kind());
                            }
                        }
                        ProxyError::HandlerFault(reason) => {
                            tracing::error!(reason = %reason, "Handler fault");
                            if self.config.observability.metrics_enabled {
                                metrics::record_handler_fault();
                            }
                        }
                        ProxyError::NoRouteMatched { .. } => {
                            tracing::debug!(error = %err, "No route matched");
                            if self.config.observability.metrics_enabled {
                                metrics::record_no_route();
                            }
                        }
                    }
                    error_response(&err)
                }
            };

            if self.config.observability.metrics_enabled {
                metrics::record_invocation(method, response.status_code, start);
            }
            tracing::info!(
                status = response.status_code,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Invocation complete"
            );
            response
        }
        .instrument(span)
        .await
    }

    async fn invoke(
        &self,
        request: ProxyRequest,
        context: InvocationContext,
    ) -> Result<ResponseSnapshot, ProxyError> {
        let mut synthetic = SyntheticRequest::from_proxy(&request, &self.config)?;
        synthetic.insert_attribute(context);
        let jar = CookieJar::from_headers(synthetic.headers());
        synthetic.insert_attribute(jar.clone());
        let http_request = synthetic.into_http_request()?;

        let (response, completion) = SyntheticResponse::new();
        tokio::spawn(
            dispatch(self.router.clone(), http_request, jar, response).in_current_span(),
        );

        completion.wait().await
    }

    fn encode(&self, snapshot: ResponseSnapshot) -> ProxyResponse {
        let headers = encode_response_headers(&snapshot.headers, &snapshot.cookies);
        let binary = snapshot
            .content_type()
            .map(|ct| self.config.is_binary_media_type(ct))
            .unwrap_or(false);

        let (body, is_base64_encoded) = match std::str::from_utf8(&snapshot.body) {
            Ok(text) if !binary => (text.to_string(), false),
            _ => (general_purpose::STANDARD.encode(&snapshot.body), true),
        };

        ProxyResponse {
            status_code: snapshot.status.as_u16(),
            headers,
            body,
            is_base64_encoded,
        }
    }

    fn runtime(&self) -> std::io::Result<&Runtime> {
        if let Some(runtime) = self.runtime.get() {
            return Ok(runtime);
        }
        let runtime = Builder::new_multi_thread()
            .enable_all()
            .thread_name("proxy-container")
            .build()?;
        Ok(self.runtime.get_or_init(move || runtime))
    }
}

/// Envelope for a request that never produced a handler response.
pub(crate) fn error_response(err: &ProxyError) -> ProxyResponse {
    let mut response = ProxyResponse {
        status_code: err.status().as_u16(),
        headers: Default::default(),
        body: String::new(),
        is_base64_encoded: false,
    };
    if let ProxyError::Decoding(e) = err {
        response.headers.insert(
            crate::codec::canonical_header_name(CONTENT_TYPE.as_str()),
            "text/plain; charset=utf-8".to_string(),
        );
        response.body = e.to_string();
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodingError;

    #[test]
    fn decoding_errors_carry_a_message() {
        let response = error_response(&ProxyError::Decoding(DecodingError::InvalidMethod(
            "GE T".into(),
        )));
        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("GE T"));
        assert_eq!(response.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn faults_have_empty_bodies() {
        let response = error_response(&ProxyError::HandlerFault("boom".into()));
        assert_eq!(response.status_code, 500);
        assert!(response.body.is_empty());
        assert!(response.headers.is_empty());
    }

    #[test]
    fn invalid_config_fails_initialization() {
        let mut config = ContainerConfig::default();
        config.max_body_size = 0;
        let err = ContainerHandler::new(RouteTable::new(), config).unwrap_err();
        assert!(matches!(err, InitializationError::Config(ConfigError::Validation(_))));
    }
}
