//! Minimal W3C Trace Context propagation.
//!
//! Outgoing requests get a fresh `traceparent` so that the remote services can
//! correlate their logs with ours without pulling in a full OpenTelemetry stack.

use http::{HeaderMap, HeaderName, HeaderValue};

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

/// Build a `traceparent` value: version 00, random trace/span ids, sampled.
pub fn new_traceparent() -> String {
    let trace_id = rand::random::<u128>();
    let span_id = rand::random::<u64>();
    format!("00-{trace_id:032x}-{span_id:016x}-01")
}

/// Insert a `traceparent` header unless the caller already set one.
/// Returns the value that is now on the request.
pub fn inject_traceparent(headers: &mut HeaderMap) -> Option<String> {
    if let Some(existing) = headers.get(TRACEPARENT).and_then(|v| v.to_str().ok()) {
        return Some(existing.to_string());
    }

    let value = new_traceparent();
    let header = HeaderValue::from_str(&value).ok()?;
    headers.insert(HeaderName::from_static(TRACEPARENT), header);
    Some(value)
}

/// Extract the trace id from a `traceparent` value.
pub fn trace_id(traceparent: &str) -> Option<&str> {
    let mut parts = traceparent.split('-');
    match (parts.next(), parts.next()) {
        (Some("00"), Some(id)) if id.len() == 32 => Some(id),
        _ => None,
    }
}
