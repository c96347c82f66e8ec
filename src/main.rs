//! Proxy Container demo runner
//!
//! Replays one proxy event through a small set of demo routes and prints
//! the resulting proxy response.
//!
//! # Architecture Overview
//!
//! ```text
//!   event JSON (file or stdin)
//!        │
//!        ▼
//!   ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!   │   envelope   │───▶│  container   │───▶│   routing    │
//!   │ ProxyRequest │    │   handler    │    │ axum Router  │
//!   └──────────────┘    └──────┬───────┘    └──────┬───────┘
//!                              │                   │
//!                              ▼                   ▼
//!   ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!   │   envelope   │◀───│    codec     │◀───│ http (synth. │
//!   │ProxyResponse │    │headers/cookie│    │  response)   │
//!   └──────────────┘    └──────────────┘    └──────────────┘
//! ```

use std::io::Read;
use std::path::PathBuf;

use axum::extract::Path;
use axum::Json;
use clap::Parser;
use serde_json::{json, Value};

use proxy_container::codec::Cookie;
use proxy_container::config::{load_config, ContainerConfig};
use proxy_container::observability::logging;
use proxy_container::{
    get_handler_with_config, ContextMetadata, CookieJar, InitializationError, InvocationContext,
    ProxyRequest, RouteTable,
};

#[derive(Parser)]
#[command(name = "proxy-container")]
#[command(about = "Replay an API gateway proxy event through the demo routes", long_about = None)]
struct Cli {
    /// Container configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Proxy event JSON. Read from stdin when omitted.
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// Pretty-print the response.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ContainerConfig::default(),
    };
    logging::init(&config.observability)?;

    tracing::info!(
        path = ?cli.config,
        base_path = ?config.base_path,
        use_stage_as_base_path = config.use_stage_as_base_path,
        "Configuration loaded"
    );

    let raw = match &cli.event {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let request: ProxyRequest = serde_json::from_str(&raw)?;

    let handler = get_handler_with_config(config, demo_routes)?;
    let response = handler.proxy(request, ContextMetadata::default());

    let out = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{out}");
    Ok(())
}

fn demo_routes(routes: RouteTable) -> Result<RouteTable, InitializationError> {
    Ok(routes
        .get("/", index)
        .get("/hello", hello)
        .get("/cookie", cookie)
        .get("/echo/{name}", echo))
}

async fn index() -> &'static str {
    "proxy-container"
}

async fn hello() -> &'static str {
    "Hello, World!"
}

async fn cookie(jar: CookieJar) -> &'static str {
    jar.add(Cookie::new("session", "demo").with_path("/").http_only(true));
    "cookie set"
}

async fn echo(Path(name): Path<String>, ctx: InvocationContext) -> Json<Value> {
    Json(json!({
        "name": name,
        "requestId": ctx.request_id(),
        "function": ctx.function_name(),
    }))
}
