//! Shared routes and event helpers for integration tests.
#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Path, Query};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::stream;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use proxy_container::codec::Cookie;
use proxy_container::config::ContainerConfig;
use proxy_container::envelope::RequestContext;
use proxy_container::{
    ContainerHandler, CookieJar, InitializationError, InvocationContext, ProxyRequest, RouteTable,
};

/// Every route the integration tests exercise.
pub fn test_routes(routes: RouteTable) -> Result<RouteTable, InitializationError> {
    Ok(routes
        .get("/", root)
        .get("/hello", hello)
        .post("/echo", echo)
        .get("/query", query)
        .get("/cookies", cookies)
        .get("/multi-header", multi_header)
        .get("/binary", binary)
        .get("/stream", streaming)
        .get("/panic", panics)
        .get("/context", context)
        .get("/users/{id}", user)
        .get("/uri", uri)
        .get("/client", client)
        .get("/created", created)
        .get("/gone", gone))
}

/// A handler built from `test_routes` with `config`.
pub fn handler_with(config: ContainerConfig) -> ContainerHandler {
    let routes = test_routes(RouteTable::new()).unwrap();
    ContainerHandler::new(routes, config).unwrap()
}

pub fn handler() -> ContainerHandler {
    handler_with(ContainerConfig::default())
}

pub fn get(path: &str) -> ProxyRequest {
    ProxyRequest::builder().method("GET").path(path).build()
}

async fn root() -> &'static str {
    "root"
}

async fn hello() -> &'static str {
    "Hello, World!"
}

async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| header::HeaderValue::from_static("application/octet-stream"));
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn query(Query(pairs): Query<Vec<(String, String)>>) -> Json<Value> {
    Json(json!(pairs))
}

async fn cookies(jar: CookieJar) -> String {
    jar.add(Cookie::new("session", "abc").with_path("/").http_only(true));
    jar.add(Cookie::new("theme", "dark").with_max_age(3600));
    format!("had={}", jar.get("visitor").unwrap_or("none"))
}

async fn multi_header() -> Response {
    Response::builder()
        .header("x-multi", "a")
        .header("x-multi", "b")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("multi"))
        .unwrap()
}

async fn binary() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/png")],
        vec![0x89u8, b'P', b'N', b'G', 0x00, 0xff],
    )
}

async fn streaming() -> Body {
    let (tx, rx) = mpsc::channel::<Bytes>(4);
    tokio::spawn(async move {
        for chunk in ["one,", "two,", "three"] {
            tokio::time::sleep(Duration::from_millis(5)).await;
            if tx.send(Bytes::from_static(chunk.as_bytes())).await.is_err() {
                return;
            }
        }
    });
    let chunks = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });
    Body::from_stream(chunks)
}

async fn panics() -> &'static str {
    panic!("handler exploded")
}

async fn context(ctx: InvocationContext) -> Json<Value> {
    Json(json!({
        "requestId": ctx.request_id(),
        "functionName": ctx.function_name(),
        "functionVersion": ctx.function_version(),
        "memoryLimitMb": ctx.memory_limit_mb(),
        "hasDeadline": ctx.deadline().is_some(),
    }))
}

async fn user(Path(id): Path<String>) -> String {
    format!("user {id}")
}

async fn uri(uri: Uri) -> String {
    uri.to_string()
}

async fn client(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    axum::Extension(context): axum::Extension<RequestContext>,
) -> String {
    format!("{} {}", addr.ip(), context.stage.unwrap_or_default())
}

async fn created() -> (StatusCode, &'static str) {
    (StatusCode::CREATED, "")
}

async fn gone() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "no such item")
}
