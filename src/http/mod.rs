//! HTTP client layer — `StoreHttp` over a pluggable [`Transport`], with
//! per-endpoint retry policies.

pub mod client;
pub mod retry;
pub mod transport;

pub use client::StoreHttp;
pub use retry::{Backoff, RetryConfig, RetryPolicy};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
