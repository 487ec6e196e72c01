//! Request tracing decorator
//!
//! [`TracedTransport`] wraps any [`Transport`] and logs each call on its way
//! through. It never touches the request or the response.

use std::time::Instant;

use async_trait::async_trait;

use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::Result;
use crate::output::formatters::{RULE, json_preview, or_placeholder};

/// Maximum number of payload characters written to the log
pub const PAYLOAD_PREVIEW_CHARS: usize = 800;

/// Transport wrapper that logs method, URL, payload, timing and request id
pub struct TracedTransport<T: Transport> {
    inner: T,
}

impl<T: Transport> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Get the wrapped transport
    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn log_request(&self, request: &ApiRequest) {
        let url = request
            .url(self.inner.base_url())
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}{}", self.inner.base_url(), request.path));

        log::info!("{}", RULE);
        log::info!("➡️  {} {}", request.method, url);

        if let Some(ref key) = request.idempotency_key {
            log::info!("   Idempotency-Key: {}", key);
        }
        if let Some(ref body) = request.body {
            log::info!("   Payload: {}", json_preview(body, PAYLOAD_PREVIEW_CHARS));
        }
    }
}

#[async_trait]
impl<T: Transport> Transport for TracedTransport<T> {
    fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.log_request(request);

        let started = Instant::now();
        let result = self.inner.send(request).await;
        let elapsed_ms = started.elapsed().as_millis();

        match result {
            Ok(ref response) => log::info!(
                "⬅️  OK ({} ms) request_id={}",
                elapsed_ms,
                or_placeholder(response.request_id.as_deref(), "-")
            ),
            Err(ref err) => log::debug!("⬅️  FAILED ({} ms): {}", elapsed_ms, err),
        }

        result
    }
}
