//! HTTP-level integration tests for the `/api/user/key` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete_auth, get, get_auth, post_json_auth};
use serde_json::json;
use waypoint_db::UserKeyStore;

#[tokio::test]
async fn key_lifecycle_set_read_masked_clear() {
    let test = build_test_app();
    let token = test.token("u1");

    let json = body_json(get_auth(test.app(), "/api/user/key", &token).await).await;
    assert_eq!(json, json!({"hasKey": false, "key": null}));

    let response = post_json_auth(
        test.app(),
        "/api/user/key",
        json!({"key": "AIzaSecretKey1234"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"success": true}));

    let json = body_json(get_auth(test.app(), "/api/user/key", &token).await).await;
    assert_eq!(json["hasKey"], true);
    let masked = json["key"].as_str().unwrap();
    assert!(masked.ends_with("1234"));
    assert!(!masked.contains("Secret"));

    let response = delete_auth(test.app(), "/api/user/key", &token).await;
    assert_eq!(body_json(response).await, json!({"success": true, "cleared": true}));

    let response = delete_auth(test.app(), "/api/user/key", &token).await;
    assert_eq!(body_json(response).await["cleared"], false);
    assert!(test.store.get_key("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn replacing_a_key_keeps_one_entry() {
    let test = build_test_app();
    let token = test.token("u1");

    post_json_auth(test.app(), "/api/user/key", json!({"key": "first-key"}), &token).await;
    post_json_auth(test.app(), "/api/user/key", json!({"key": "second-key"}), &token).await;

    let stored = test.store.get_key("u1").await.unwrap().unwrap();
    assert_eq!(stored.api_key, "second-key");
}

#[tokio::test]
async fn blank_key_returns_400() {
    let test = build_test_app();
    let response = post_json_auth(
        test.app(),
        "/api/user/key",
        json!({"key": "   "}),
        &test.token("u1"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(test.store.get_key("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn keys_are_per_user() {
    let test = build_test_app();
    post_json_auth(
        test.app(),
        "/api/user/key",
        json!({"key": "u1-only-key"}),
        &test.token("u1"),
    )
    .await;

    let json = body_json(get_auth(test.app(), "/api/user/key", &test.token("u2")).await).await;
    assert_eq!(json["hasKey"], false);
}

#[tokio::test]
async fn key_routes_require_auth() {
    let test = build_test_app();
    let response = get(test.app(), "/api/user/key").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
