//! End-to-end router tests: authentication gate in front of generation.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use quill_api::{build_router, AppState};
use quill_auth::{hash_session_secret, CredentialResolver, MemoryCredentialStore};
use quill_core::{ClientRecord, ClientStatus, SessionTokenId, SessionTokenRecord, UserId};
use quill_llm::{BackendSelector, GenerationSettings, MockTransport};
use quill_service::GenerationService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const PARTNER_TOKEN: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";
const SUSPENDED_TOKEN: &str = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
const SESSION_TOKEN: &str = "5|abcdef123";

struct Harness {
    app: Router,
    transport: Arc<MockTransport>,
    owner: UserId,
    session_user: UserId,
}

fn harness(transport: MockTransport) -> Harness {
    let owner = UserId::new();
    let session_user = UserId::new();

    let store = Arc::new(MemoryCredentialStore::new());
    store.insert_client(ClientRecord::new("partner", PARTNER_TOKEN, Some(owner)));
    store.insert_client(
        ClientRecord::new("former partner", SUSPENDED_TOKEN, Some(UserId::new()))
            .with_status(ClientStatus::Suspended),
    );
    store.insert_session(SessionTokenRecord {
        id: SessionTokenId::new(5),
        user_id: session_user,
        secret_hash: hash_session_secret("abcdef123"),
        expires_at: None,
    });

    let mut settings = GenerationSettings::default();
    settings.openai.api_key = "sk-test".to_string();
    settings.anthropic.api_key = "ak-test".to_string();

    let transport = Arc::new(transport);
    let selector = BackendSelector::new(settings, transport.clone());
    let state = AppState::new(
        CredentialResolver::new(store.clone(), store),
        GenerationService::new(selector),
    );

    Harness {
        app: build_router(state),
        transport,
        owner,
        session_user,
    }
}

fn openai_reply(text: &str) -> MockTransport {
    MockTransport::responding(
        200,
        json!({"choices": [{"message": {"role": "assistant", "content": text}}]}).to_string(),
    )
}

fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, authorization: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", authorization)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn unauthenticated() -> Value {
    json!({"status": 401, "message": "Unauthenticated.", "code": "UNAUTHORIZED"})
}

#[tokio::test]
async fn health_is_public_and_reports_backends() {
    let h = harness(openai_reply("unused"));
    let (status, body) = send(&h.app, get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["default_backend"], "openai");
    assert_eq!(body["backends"]["openai"], true);
    assert_eq!(body["backends"]["gemini"], false);
}

#[tokio::test]
async fn missing_and_invalid_credentials_get_the_same_response() {
    let h = harness(openai_reply("unused"));

    let attempts = [
        None,
        Some(""),
        Some("Bearer "),
        Some("Basic dXNlcjpwYXNz"),
        Some("Bearer not-a-token"),
        Some("Bearer 5|wrong"),
        Some("Bearer 0000000000000000000000000000000000000000000000000000000000000000"),
    ];

    for authorization in attempts {
        let (status, body) = send(&h.app, get("/v1/whoami", authorization)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{authorization:?}");
        assert_eq!(body, unauthenticated(), "{authorization:?}");
    }
}

#[tokio::test]
async fn suspended_client_is_rejected() {
    let h = harness(openai_reply("unused"));
    let (status, body) = send(
        &h.app,
        get("/v1/whoami", Some(&format!("Bearer {SUSPENDED_TOKEN}"))),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthenticated());
}

#[tokio::test]
async fn permanent_token_resolves_to_client_owner() {
    let h = harness(openai_reply("unused"));
    let (status, body) = send(
        &h.app,
        get("/v1/whoami", Some(&format!("Bearer {PARTNER_TOKEN}"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scheme"], "permanent-token");
    assert_eq!(body["user_id"], h.owner.to_string());
    assert!(body["client_id"].is_string());
}

#[tokio::test]
async fn session_token_resolves_to_session_user() {
    let h = harness(openai_reply("unused"));
    let (status, body) = send(
        &h.app,
        get("/v1/whoami", Some(&format!("bearer {SESSION_TOKEN}"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scheme"], "session-token");
    assert_eq!(body["user_id"], h.session_user.to_string());
    assert!(body.get("client_id").is_none());
}

#[tokio::test]
async fn metrics_require_authentication() {
    let h = harness(openai_reply("unused"));

    let (status, _) = send(&h.app, get("/metrics", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = h
        .app
        .clone()
        .oneshot(get("/metrics", Some(&format!("Bearer {PARTNER_TOKEN}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("quill_auth_attempts_total"));
}

#[tokio::test]
async fn generate_with_default_backend() {
    let h = harness(openai_reply("Once upon a time"));
    let (status, body) = send(
        &h.app,
        post_json(
            "/v1/generate",
            &format!("Bearer {PARTNER_TOKEN}"),
            json!({"prompt": "Tell me a story"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"backend": "openai", "text": "Once upon a time"}));

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body["messages"][0]["content"], "Tell me a story");
}

#[tokio::test]
async fn generate_rejects_unauthenticated_before_any_backend_call() {
    let h = harness(openai_reply("unused"));
    let (status, body) = send(
        &h.app,
        post_json("/v1/generate", "Bearer 9|nope", json!({"prompt": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthenticated());
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn generate_unknown_backend_is_bad_request() {
    let h = harness(openai_reply("unused"));
    let (status, body) = send(
        &h.app,
        post_json(
            "/v1/generate",
            &format!("Bearer {SESSION_TOKEN}"),
            json!({"prompt": "hi", "backend": "OpenAI"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNKNOWN_BACKEND");
    assert_eq!(body["status"], 400);
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn generate_unconfigured_backend_is_unavailable() {
    let h = harness(openai_reply("unused"));
    let (status, body) = send(
        &h.app,
        post_json(
            "/v1/generate",
            &format!("Bearer {SESSION_TOKEN}"),
            json!({"prompt": "hi", "backend": "gemini"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "BACKEND_UNCONFIGURED");
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn generate_backend_failure_is_bad_gateway() {
    let h = harness(MockTransport::responding(500, "upstream exploded"));
    let (status, body) = send(
        &h.app,
        post_json(
            "/v1/generate",
            &format!("Bearer {PARTNER_TOKEN}"),
            json!({"prompt": "hi", "backend": "anthropic"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "BACKEND_REQUEST_FAILED");
    assert!(body["message"].as_str().unwrap().contains("upstream exploded"));
}

#[tokio::test]
async fn generate_unexpected_shape_is_bad_gateway() {
    let h = harness(MockTransport::responding(200, r#"{"id":"x"}"#));
    let (status, body) = send(
        &h.app,
        post_json(
            "/v1/generate",
            &format!("Bearer {PARTNER_TOKEN}"),
            json!({"prompt": "hi"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "BACKEND_UNEXPECTED_RESPONSE");
}

#[tokio::test]
async fn request_id_header_matches_request_context() {
    let h = harness(openai_reply("unused"));
    let response = h
        .app
        .clone()
        .oneshot(get("/v1/whoami", Some(&format!("Bearer {PARTNER_TOKEN}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap();
    assert!(uuid::Uuid::parse_str(&header).is_ok(), "{header}");

    let bytes = to_bytes(response.into_body(), 4096).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["request_id"], header);
}

#[tokio::test]
async fn caller_supplied_request_id_is_kept() {
    let h = harness(openai_reply("unused"));
    let request = Request::builder()
        .uri("/v1/whoami")
        .header("authorization", format!("Bearer {SESSION_TOKEN}"))
        .header("x-request-id", "trace-7f3a")
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-7f3a");
    let bytes = to_bytes(response.into_body(), 4096).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["request_id"], "trace-7f3a");
}

#[tokio::test]
async fn rejected_requests_carry_a_request_id() {
    let h = harness(openai_reply("unused"));
    let response = h.app.clone().oneshot(get("/v1/whoami", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn tab_separated_bearer_scheme_is_accepted() {
    let h = harness(openai_reply("unused"));
    let (status, body) = send(
        &h.app,
        get("/v1/whoami", Some(&format!("Bearer\t{PARTNER_TOKEN}"))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scheme"], "permanent-token");
}

#[tokio::test]
async fn generate_without_prompt_returns_json_error() {
    let h = harness(openai_reply("unused"));
    let (status, body) = send(
        &h.app,
        post_json(
            "/v1/generate",
            &format!("Bearer {PARTNER_TOKEN}"),
            json!({"backend": "openai"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert_eq!(body["code"], "INVALID_REQUEST_BODY");
    assert!(body["message"].is_string());
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn generate_with_malformed_json_returns_json_error() {
    let h = harness(openai_reply("unused"));
    let request = Request::builder()
        .method("POST")
        .uri("/v1/generate")
        .header("authorization", format!("Bearer {PARTNER_TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from("{\"prompt\": "))
        .unwrap();
    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["code"], "INVALID_REQUEST_BODY");
    assert_eq!(h.transport.call_count(), 0);
}
