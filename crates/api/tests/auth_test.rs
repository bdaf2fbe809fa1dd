//! Admin gate tests.

mod common;

use axum::http::StatusCode;
use common::{TEST_SECRET, spawn_app};
use tadika_shared::{JwtConfig, JwtService};
use uuid::Uuid;

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let (status, body) = app.call_as(None, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = spawn_app().await;

    let (status, body) = app.call_as(None, "GET", "/academic-years", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = spawn_app().await;

    let (status, body) = app
        .call_as(Some("not.a.jwt"), "GET", "/academic-years", None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let app = spawn_app().await;
    let foreign = JwtService::new(&JwtConfig {
        secret: "some-other-secret".to_string(),
        access_token_expiry_secs: 900,
    })
    .generate_access_token(Uuid::new_v4(), "admin")
    .unwrap();

    let (status, _) = app
        .call_as(Some(&foreign), "GET", "/academic-years", None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let app = spawn_app().await;
    let teacher = JwtService::new(&JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry_secs: 900,
    })
    .generate_access_token(Uuid::new_v4(), "teacher")
    .unwrap();

    let (status, body) = app
        .call_as(Some(&teacher), "GET", "/academic-years", None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_admin_is_admitted() {
    let app = spawn_app().await;

    let (status, body) = app.call("GET", "/academic-years", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}
