//! Webhook receiver HTTP server
//!
//! ```text
//! POST /webhook   verify signature, log the event, acknowledge
//! GET  /health    always 200
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use super::signature::{SIGNATURE_HEADER, SignatureVerifier, TIMESTAMP_HEADER};
use crate::config::WebhookConfig;
use crate::error::{Error, Result};
use crate::output::formatters::{json_preview_pretty, or_placeholder, preview};

/// Event type delivered when an async request finishes
pub const EVENT_REQUEST_COMPLETE: &str = "request.complete";

const RESULT_PREVIEW_CHARS: usize = 500;
const SIGNATURE_PREVIEW_CHARS: usize = 50;
const BANNER: &str = "==================================================";

/// Router state shared by every handler
#[derive(Clone)]
pub struct WebhookState {
    verifier: Arc<dyn SignatureVerifier>,
}

impl WebhookState {
    pub fn new(verifier: impl SignatureVerifier + 'static) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}

/// Event payload fields the receiver looks at; everything else is ignored.
///
/// Fields keep whatever JSON type the sender used.
#[derive(Debug, Default)]
pub struct WebhookEvent {
    pub event: Option<Value>,
    pub request_id: Option<Value>,
    pub org_id: Option<Value>,
    pub kind: Option<Value>,
    pub result: Option<Value>,
}

impl WebhookEvent {
    /// Pick the known fields out of a payload. Non-object payloads yield no fields.
    pub fn from_payload(payload: &Value) -> Self {
        let field = |name: &str| payload.get(name).cloned();
        Self {
            event: field("event"),
            request_id: field("request_id"),
            org_id: field("org_id"),
            kind: field("kind"),
            result: field("result"),
        }
    }

    pub fn is_request_complete(&self) -> bool {
        self.event.as_ref().and_then(Value::as_str) == Some(EVENT_REQUEST_COMPLETE)
    }
}

/// Strings as-is, other values as compact JSON, absent or null as `None`
fn display_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn build_router(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .route("/health", get(health))
        .with_state(state)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn handle_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let timestamp = header(&headers, TIMESTAMP_HEADER);
    let signature = header(&headers, SIGNATURE_HEADER);

    log::info!("{}", BANNER);
    log::info!("Received webhook");
    log::info!("  Timestamp: {}", or_placeholder(timestamp, "None"));
    log::info!(
        "  Signature: {}",
        signature
            .map(|s| preview(s, SIGNATURE_PREVIEW_CHARS))
            .unwrap_or_else(|| "None".to_string())
    );

    if !state.verifier.verify(timestamp, &body, signature) {
        log::error!("Invalid signature!");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid signature"})),
        );
    }
    log::info!("  Signature: VALID");

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            log::error!("Invalid JSON payload: {}", err);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid JSON payload"})),
            );
        }
    };

    log_event(&WebhookEvent::from_payload(&payload));
    log::info!("{}", BANNER);

    (StatusCode::OK, Json(json!({"status": "ok"})))
}

fn log_event(event: &WebhookEvent) {
    log::info!("  Event: {}", display_field(event.event.as_ref()));
    log::info!("  Request ID: {}", display_field(event.request_id.as_ref()));
    log::info!("  Org ID: {}", display_field(event.org_id.as_ref()));
    log::info!("  Kind: {}", display_field(event.kind.as_ref()));

    if event.is_request_complete() {
        let result = event.result.clone().unwrap_or_else(|| json!({}));
        log::info!(
            "  Result: {}",
            json_preview_pretty(&result, RESULT_PREVIEW_CHARS)
        );
    }
}

async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({"status": "healthy"})))
}

/// Serve the receiver on `0.0.0.0:{port}` until Ctrl-C.
pub async fn serve(config: &WebhookConfig, verifier: impl SignatureVerifier + 'static) -> Result<()> {
    if config.secret.is_empty() {
        log::warn!("WEBHOOK_SECRET is not set; only deliveries signed with an empty secret will verify.");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Other(format!("Failed to bind {}: {}", addr, e)))?;

    log::info!("Starting webhook server on http://localhost:{}", config.port);
    log::info!("Webhook endpoint: http://localhost:{}/webhook", config.port);
    log::info!("");
    log::info!("To expose publicly, run: ngrok http {}", config.port);
    log::info!("Then register: crebain-webhook --register https://xxx.ngrok.io/webhook");

    axum::serve(listener, build_router(WebhookState::new(verifier)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Shutting down webhook server");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::signature::HmacVerifier;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    const SECRET: &str = "whsec_0123456789abcdef";
    const TIMESTAMP: &str = "1704067200";

    fn router() -> Router {
        build_router(WebhookState::new(HmacVerifier::new(SECRET)))
    }

    fn delivery(body: &str, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .header(TIMESTAMP_HEADER, TIMESTAMP);
        if let Some(signature) = signature {
            builder = builder.header(SIGNATURE_HEADER, signature);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_signature_is_acknowledged() {
        let body = r#"{"event":"request.complete","request_id":"areq_1","org_id":"org_1","kind":"entity_enrich","result":{"score":3}}"#;
        let signature = HmacVerifier::new(SECRET).sign(TIMESTAMP, body.as_bytes());

        let response = router()
            .oneshot(delivery(body, Some(signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_non_string_fields_are_acknowledged() {
        let body = r#"{"event":"request.complete","request_id":7,"org_id":42,"kind":null,"result":[1,2]}"#;
        let signature = HmacVerifier::new(SECRET).sign(TIMESTAMP, body.as_bytes());

        let response = router()
            .oneshot(delivery(body, Some(signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_signed_non_object_json_is_acknowledged() {
        let body = r#""just a string""#;
        let signature = HmacVerifier::new(SECRET).sign(TIMESTAMP, body.as_bytes());

        let response = router()
            .oneshot(delivery(body, Some(signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_secret_is_rejected() {
        let body = r#"{"event":"request.complete"}"#;
        let signature = HmacVerifier::new("not-the-secret").sign(TIMESTAMP, body.as_bytes());

        let response = router()
            .oneshot(delivery(body, Some(signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({"error": "Invalid signature"}));
    }

    #[tokio::test]
    async fn test_modified_body_is_rejected() {
        let signature = HmacVerifier::new(SECRET).sign(TIMESTAMP, br#"{"event":"a"}"#);

        let response = router()
            .oneshot(delivery(r#"{"event":"b"}"#, Some(signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_signature_is_rejected() {
        let response = router()
            .oneshot(delivery(r#"{"event":"request.complete"}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signed_non_json_body_is_bad_request() {
        let body = "not json";
        let signature = HmacVerifier::new(SECRET).sign(TIMESTAMP, body.as_bytes());

        let response = router()
            .oneshot(delivery(body, Some(signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_always_ok() {
        let requests = vec![
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
            Request::builder()
                .uri("/health?probe=1")
                .header(SIGNATURE_HEADER, "v1=garbage")
                .header("content-type", "text/plain")
                .body(Body::from("ignored"))
                .unwrap(),
        ];

        for request in requests {
            let response = router().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await, json!({"status": "healthy"}));
        }
    }

    #[test]
    fn test_event_ignores_unknown_fields() {
        let event =
            WebhookEvent::from_payload(&json!({"event": "request.failed", "extra": {"a": 1}}));
        assert_eq!(event.event, Some(json!("request.failed")));
        assert!(!event.is_request_complete());
        assert!(event.result.is_none());
    }

    #[test]
    fn test_event_from_non_object_is_empty() {
        let event = WebhookEvent::from_payload(&json!([1, 2, 3]));
        assert!(event.event.is_none());
        assert!(event.org_id.is_none());
    }

    #[test]
    fn test_display_field_renders_any_type() {
        assert_eq!(display_field(Some(&json!("org_1"))), "org_1");
        assert_eq!(display_field(Some(&json!(42))), "42");
        assert_eq!(display_field(Some(&json!({"a": true}))), r#"{"a":true}"#);
        assert_eq!(display_field(Some(&Value::Null)), "None");
        assert_eq!(display_field(None), "None");
    }
}
