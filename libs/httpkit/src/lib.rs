//! Outgoing HTTP plumbing: a traced `reqwest` wrapper with a per-request
//! timeout, W3C trace context propagation and bounded retries for
//! idempotent calls.

pub mod client;
pub mod trace_context;

pub use client::{ClientError, RetryPolicy, TracedClient, TracedClientBuilder};
