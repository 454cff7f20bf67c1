//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bytes::Bytes;
use http_body_util::BodyExt;
use relay_core::llm::OutboundPayload;
use relay_core::llm::upstream::{CompletionTransport, TransportError, UpstreamResponse};
use relay_core::{FallbackRelay, RelayConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;

/// Upstream stand-in replaying canned responses in order.
struct CannedTransport {
    replies: Mutex<VecDeque<(u16, Vec<Result<String, TransportError>>)>>,
    calls: Mutex<usize>,
}

impl CannedTransport {
    fn new(replies: Vec<(u16, Vec<Result<String, TransportError>>)>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CompletionTransport for CannedTransport {
    async fn post_completion(
        &self,
        _payload: &OutboundPayload,
    ) -> Result<UpstreamResponse, TransportError> {
        *self.calls.lock().unwrap() += 1;
        let (status, chunks) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected upstream call");
        let body = futures::stream::iter(
            chunks
                .into_iter()
                .map(|c| c.map(Bytes::from))
                .collect::<Vec<_>>(),
        );
        Ok(UpstreamResponse::new(status, Box::pin(body)))
    }
}

fn record(content: &str) -> Result<String, TransportError> {
    Ok(format!(
        "data: {}\n\n",
        json!({"choices": [{"delta": {"content": content}}]})
    ))
}

fn done() -> Result<String, TransportError> {
    Ok("data: [DONE]\n\n".to_string())
}

fn text(body: &str) -> Vec<Result<String, TransportError>> {
    vec![Ok(body.to_string())]
}

fn config() -> RelayConfig {
    RelayConfig::default()
        .with_api_key("sk-or-test")
        .with_models(["model-a", "model-b"])
}

fn app(config: RelayConfig, transport: Arc<CannedTransport>) -> Router {
    let relay = FallbackRelay::new(Arc::new(config), transport);
    build(Arc::new(AppState::with_relay(relay)))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_stream_reply_concatenates_chunks() {
    let transport = CannedTransport::new(vec![
        (503, text("overloaded")),
        (200, vec![record("Hello"), record(", world"), done()]),
    ]);
    let response = app(config(), transport.clone())
        .oneshot(post_json("/", json!({"message": "hi", "history": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.headers()[MODEL_HEADER], "model-b");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Hello, world");
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_api_chat_route_streams() {
    let transport = CannedTransport::new(vec![(200, vec![record("ok"), done()])]);
    let response = app(config(), transport)
        .oneshot(post_json("/api/chat", json!({"message": "hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[MODEL_HEADER], "model-a");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_empty_message_is_400_without_upstream_calls() {
    let transport = CannedTransport::new(vec![]);
    let response = app(config(), transport.clone())
        .oneshot(post_json("/", json!({"message": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No message provided");
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let transport = CannedTransport::new(vec![]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app(config(), transport.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await.get("error").is_some());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_missing_api_key_is_500_with_generic_message() {
    let transport = CannedTransport::new(vec![]);
    let mut config = config();
    config.api_key = None;

    let response = app(config, transport.clone())
        .oneshot(post_json("/", json!({"message": "hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Server configuration error");
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_all_models_unavailable_is_503() {
    let transport = CannedTransport::new(vec![(429, text("")), (500, text(""))]);
    let response = app(config(), transport)
        .oneshot(post_json("/", json!({"message": "hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "All models are currently unavailable");
    assert_eq!(body["detail"], "model-b: unavailable (status 500)");
}

#[tokio::test]
async fn test_upstream_client_error_status_is_passed_through() {
    let transport = CannedTransport::new(vec![(
        401,
        text(r#"{"error":{"message":"No auth credentials found","code":401}}"#),
    )]);
    let response = app(config(), transport.clone())
        .oneshot(post_json("/", json!({"message": "hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("No auth credentials found")
    );
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_mid_stream_failure_aborts_body() {
    let transport = CannedTransport::new(vec![(
        200,
        vec![
            record("partial"),
            Err(TransportError::Body("connection reset".into())),
        ],
    )]);
    let response = app(config(), transport)
        .oneshot(post_json("/", json!({"message": "hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result = response.into_body().collect().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_mid_stream_failure_with_error_marker() {
    let transport = CannedTransport::new(vec![(
        200,
        vec![
            record("partial"),
            Err(TransportError::Body("connection reset".into())),
        ],
    )]);
    let mut config = config();
    config.stream_error_marker = true;

    let response = app(config, transport)
        .oneshot(post_json("/", json!({"message": "hi"})))
        .await
        .unwrap();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("partial\n[Error: "));
    assert!(text.contains("connection reset"));
    assert!(text.ends_with(']'));
}

#[tokio::test]
async fn test_buffered_reply() {
    let transport = CannedTransport::new(vec![
        (502, text("bad gateway")),
        (
            200,
            text(r#"{"choices":[{"message":{"role":"assistant","content":"Hi!"}}]}"#),
        ),
    ]);
    let response = app(config(), transport)
        .oneshot(post_json("/api/reply", json!({"message": "hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"reply": "Hi!", "model": "model-b"})
    );
}

#[tokio::test]
async fn test_buffered_reply_without_content_is_500() {
    let transport = CannedTransport::new(vec![(200, text(r#"{"choices":[]}"#))]);
    let response = app(config(), transport)
        .oneshot(post_json("/api/reply", json!({"message": "hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health() {
    let transport = CannedTransport::new(vec![]);
    let response = app(config(), transport)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["models"], json!(["model-a", "model-b"]));
}

#[tokio::test]
async fn test_cors_preflight_with_allow_list() {
    let transport = CannedTransport::new(vec![]);
    let mut config = config();
    config.allowed_origins = vec!["https://chat.example.com".to_string()];

    let response = app(config, transport)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/chat")
                .header(header::ORIGIN, "https://chat.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://chat.example.com"
    );
}

#[tokio::test]
async fn test_cors_allow_list_without_usable_entries_admits_no_origin() {
    let transport = CannedTransport::new(vec![]);
    let mut config = config();
    config.allowed_origins = vec!["https://ok.example\u{7f}".to_string()];

    let response = app(config, transport)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/chat")
                .header(header::ORIGIN, "https://evil.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
