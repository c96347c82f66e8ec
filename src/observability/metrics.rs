//! Invocation metrics.
//!
//! # Metrics
//! - `container_invocations_total` (counter): invocations by method, status
//! - `container_invocation_duration_seconds` (histogram): end-to-end latency
//! - `container_decode_errors_total` (counter): rejected events by kind
//! - `container_handler_faults_total` (counter): panics and broken bodies
//! - `container_no_route_total` (counter): requests no route matched
//!
//! Recorded through the `metrics` facade; installing an exporter is up to
//! the embedding process.
//!
//! Method labels come from [`method_label`], so the label set stays bounded
//! whatever the event carries.

use std::time::Instant;

use axum::http::Method;
use metrics::{counter, histogram};

/// Bounded label for an event's raw method: the standard method name,
/// `"other"` for a valid extension method, `"invalid"` otherwise.
pub fn method_label(raw: &str) -> &'static str {
    let Ok(method) = Method::from_bytes(raw.to_ascii_uppercase().as_bytes()) else {
        return "invalid";
    };
    match method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::OPTIONS => "OPTIONS",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => "other",
    }
}

pub fn record_invocation(method: &'static str, status: u16, start: Instant) {
    counter!(
        "container_invocations_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("container_invocation_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_decode_error(kind: &'static str) {
    counter!("container_decode_errors_total", "kind" => kind).increment(1);
}

pub fn record_handler_fault() {
    counter!("container_handler_faults_total").increment(1);
}

pub fn record_no_route() {
    counter!("container_no_route_total").increment(1);
}
