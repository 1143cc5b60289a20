//! Low-level HTTP client — `StoreHttp`.
//!
//! Resolves paths against the base URL, attaches the bearer token for
//! non-public endpoints, maps status codes to [`HttpError`]s carrying the
//! server's `message`, and wraps the transport call in the retry decorator.
//! Internal to the SDK — the sub-clients wrap this.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::http::transport::{HttpRequest, Transport, TransportError};
use crate::network;
use crate::session::Session;

/// Low-level HTTP client for the storefront REST API.
pub struct StoreHttp {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Session,
    /// Config behind [`RetryPolicy::Idempotent`].
    retry: RetryConfig,
    timeout: Duration,
}

/// One logical request, carried unchanged through every retry except for
/// `attempt`.
#[derive(Debug, Clone)]
pub(crate) struct RequestContext {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
    pub timeout: Duration,
    /// 0 for the initial request.
    pub attempt: u32,
}

/// Error body the backend sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: Option<String>,
}

impl StoreHttp {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        session: Session,
        retry: RetryConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
            retry,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    // ── Typed helpers ────────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let body = self
            .send(self.context(Method::GET, path, None), &retry)
            .await?;
        decode(&body)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let text = self.post_text(path, body, retry).await?;
        decode(&text)
    }

    /// POST with a non-default deadline.
    pub(crate) async fn post_with_timeout<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let mut ctx = self.context(Method::POST, path, Some(encode(body)?));
        ctx.timeout = timeout;
        let text = self.send(ctx, &retry).await?;
        decode(&text)
    }

    /// POST returning the raw response text (for endpoints that answer with
    /// a bare sentence instead of JSON).
    pub(crate) async fn post_text<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<String, HttpError> {
        let ctx = self.context(Method::POST, path, Some(encode(body)?));
        self.send(ctx, &retry).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let ctx = self.context(Method::PUT, path, Some(encode(body)?));
        let text = self.send(ctx, &retry).await?;
        decode(&text)
    }

    /// DELETE returning the raw response text.
    pub(crate) async fn delete_text(
        &self,
        path: &str,
        retry: RetryPolicy,
    ) -> Result<String, HttpError> {
        self.send(self.context(Method::DELETE, path, None), &retry)
            .await
    }

    // ── Retry decorator ──────────────────────────────────────────────────

    fn context(&self, method: Method, path: &str, body: Option<String>) -> RequestContext {
        RequestContext {
            method,
            path: path.to_string(),
            body,
            timeout: self.timeout,
            attempt: 0,
        }
    }

    async fn send(
        &self,
        mut ctx: RequestContext,
        retry: &RetryPolicy,
    ) -> Result<String, HttpError> {
        let config = match retry {
            RetryPolicy::None => return self.dispatch(&ctx).await,
            RetryPolicy::Idempotent => &self.retry,
            RetryPolicy::Custom(c) => c,
        };

        loop {
            match self.dispatch(&ctx).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    if ctx.attempt >= config.max_retries || !config.should_retry(&ctx.method, &e) {
                        if ctx.attempt > 0 {
                            warn!(
                                attempts = ctx.attempt + 1,
                                path = %ctx.path,
                                error = %e,
                                "Giving up on request"
                            );
                        }
                        return Err(e);
                    }

                    ctx.attempt += 1;
                    let delay = config.delay_for_attempt(ctx.attempt);
                    debug!(
                        attempt = ctx.attempt,
                        max = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying {} {}",
                        ctx.method,
                        ctx.path
                    );
                    if !delay.is_zero() {
                        futures_timer::Delay::new(delay).await;
                    }
                }
            }
        }
    }

    async fn dispatch(&self, ctx: &RequestContext) -> Result<String, HttpError> {
        let public = network::is_public_endpoint(&ctx.path);

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if !public {
            if let Some(token) = self.session.token() {
                headers.push(("Authorization".to_string(), format!("Bearer {token}")));
            }
        }

        let request = HttpRequest {
            method: ctx.method.clone(),
            url: format!("{}{}", self.base_url, ctx.path),
            headers,
            body: ctx.body.clone(),
            timeout: ctx.timeout,
        };

        let resp = self.transport.send(request).await.map_err(|e| match e {
            TransportError::Timeout => HttpError::Timeout,
            TransportError::Network(detail) => {
                debug!(path = %ctx.path, %detail, "No response received");
                HttpError::Network(None)
            }
        })?;

        if resp.is_success() {
            return Ok(resp.body);
        }

        let error = classify_status(resp.status, error_message(&resp.body));
        if matches!(error, HttpError::Unauthorized(_)) && !public {
            warn!(path = %ctx.path, "Unauthorized — clearing session");
            self.session.clear_auth();
        }
        Err(error)
    }
}

impl Clone for StoreHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            transport: self.transport.clone(),
            session: self.session.clone(),
            retry: self.retry.clone(),
            timeout: self.timeout,
        }
    }
}

fn classify_status(status: u16, message: Option<String>) -> HttpError {
    match status {
        401 => HttpError::Unauthorized(message),
        403 => HttpError::Forbidden(message),
        404 => HttpError::NotFound(message),
        408 => HttpError::ServerError { status, message },
        400..=499 => HttpError::BadRequest { status, message },
        _ => HttpError::ServerError { status, message },
    }
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

fn encode<B: Serialize>(body: &B) -> Result<String, HttpError> {
    serde_json::to_string(body).map_err(|e| HttpError::Decode(format!("request body: {e}")))
}

/// Empty bodies decode as JSON `null`, so `()` and `Option<_>` targets work
/// against endpoints that answer 200 with nothing.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, HttpError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| HttpError::Decode(e.to_string()))
}

/// A text response, unwrapping a JSON string literal if the server sent one.
pub(crate) fn plain_text(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.trim().to_string())
}
