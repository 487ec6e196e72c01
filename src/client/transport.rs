//! HTTP transport for the Crebain API
//!
//! A [`Transport`] sends one [`ApiRequest`] and returns the unwrapped success
//! payload plus the request id the service assigned. Everything above it
//! (typed operations, tracing) is transport-agnostic.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, Url};
use serde_json::Value;

use crate::error::{ApiError, ErrorKind, RemoteError, Result};

const API_KEY_HEADER: &str = "X-API-Key";
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// A single API call, described independently of how it is sent
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,

    /// Path below the base URL, e.g. `/v1/entities`
    pub path: String,

    pub query: Vec<(String, String)>,

    /// JSON body; `None` for bodiless requests
    pub body: Option<Value>,

    pub idempotency_key: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            idempotency_key: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_idempotency_key(mut self, key: Option<String>) -> Self {
        self.idempotency_key = key;
        self
    }

    /// Fully-qualified URL of this request below `base_url`
    pub fn url(&self, base_url: &str) -> std::result::Result<Url, ApiError> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        let parsed = if self.query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, &self.query)
        };
        parsed.map_err(|e| ApiError::InvalidRequest(format!("Invalid URL {}: {}", raw, e)))
    }
}

/// Unwrapped success payload
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Contents of the `data` envelope, or the whole body without one
    pub data: Value,

    /// Server-assigned request id, for support and debugging
    pub request_id: Option<String>,
}

/// Sends requests to the Crebain API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Base URL requests are resolved against
    fn base_url(&self) -> &str;

    /// Send a request, returning the unwrapped payload or a typed error
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// `reqwest`-backed transport with API key authentication
pub struct HttpTransport {
    http: HttpClient,
    base_url: String,
    api_key: String,
    anon_key: Option<String>,
}

impl HttpTransport {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        anon_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            anon_key,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = request.url(&self.base_url)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(ref anon_key) = self.anon_key {
            builder = builder.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", anon_key));
        }
        if let Some(ref key) = request.idempotency_key {
            builder = builder.header(IDEMPOTENCY_KEY_HEADER, key);
        }

        match (&request.method, &request.body) {
            (_, Some(body)) => builder = builder.body(body.to_string()),
            (&Method::POST, None) => builder = builder.body("{}"),
            _ => {}
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            return Err(ApiError::Remote(parse_error(status.as_u16(), &text)).into());
        }

        Ok(parse_success(&text)?)
    }
}

/// Unwrap a success envelope: `{"data": ..., "request_id": ...}`
pub fn parse_success(body: &str) -> std::result::Result<ApiResponse, ApiError> {
    if body.trim().is_empty() {
        return Ok(ApiResponse {
            data: Value::Null,
            request_id: None,
        });
    }

    let mut envelope: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let request_id = envelope
        .get("request_id")
        .and_then(Value::as_str)
        .map(str::to_string);

    let data = match envelope.get_mut("data") {
        Some(data) => data.take(),
        None => envelope,
    };

    Ok(ApiResponse { data, request_id })
}

/// Decode an error envelope: `{"error": {"code", "message", "request_id"}}`
pub fn parse_error(status: u16, body: &str) -> RemoteError {
    let mut code = "UNKNOWN".to_string();
    let mut message = "Unknown error".to_string();
    let mut request_id = None;

    match serde_json::from_str::<Value>(body) {
        Ok(json) => {
            if let Some(error) = json.get("error").filter(|e| e.is_object()) {
                if let Some(c) = error.get("code").and_then(Value::as_str) {
                    code = c.to_string();
                }
                if let Some(m) = error.get("message").and_then(Value::as_str) {
                    message = m.to_string();
                }
                request_id = error
                    .get("request_id")
                    .and_then(Value::as_str)
                    .map(str::to_string);
            }
        }
        Err(_) if !body.is_empty() => message = body.to_string(),
        Err(_) => {}
    }

    RemoteError {
        kind: ErrorKind::classify(&code, status),
        status,
        code,
        message,
        request_id,
        response_body: (!body.is_empty()).then(|| body.to_string()),
    }
}
