//! Boots application state from the shipped deployment files.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use quill_api::{build_router, build_state};
use quill_service::Config;
use std::path::PathBuf;
use tower::ServiceExt;

fn deploy_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../deploy")
}

fn deploy_config() -> Config {
    let mut config = Config::from_file(deploy_dir().join("config.toml")).unwrap();
    config.auth.seed_file = Some(deploy_dir().join("seed.json"));
    config
}

#[test]
fn deploy_config_is_valid() {
    let config = deploy_config();
    config.validate().unwrap();
    assert_eq!(config.generation.default_backend, "openai");
    assert_eq!(config.generation.anthropic.version.as_deref(), Some("2023-06-01"));
}

#[tokio::test]
async fn seeded_credentials_authenticate() {
    let app = build_router(build_state(&deploy_config()).unwrap());

    for (authorization, scheme) in [
        (
            "Bearer 0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0",
            "permanent-token",
        ),
        ("Bearer 1|local-dev-secret", "session-token"),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/whoami")
                    .header("authorization", authorization)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 4096).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["scheme"], scheme);
        assert_eq!(body["user_id"], "5b2f7c1e-9d3a-4c8e-b1f6-2a7d9e0c4b13");
    }
}

#[test]
fn missing_seed_file_fails_startup() {
    let mut config = deploy_config();
    config.auth.seed_file = Some(deploy_dir().join("does-not-exist.json"));
    assert!(build_state(&config).is_err());
}
