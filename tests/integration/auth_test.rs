//! Registration, login, token verification and profile endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_register_login_and_verify_carries_role_permissions() {
    let app = TestApp::new();
    app.register("alice", "alumni").await;

    let token = app.login("alice", PASSWORD).await;
    let response = app.request("GET", "/api/auth/verify", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let claims = &response.body["data"];
    assert_eq!(claims["username"], "alice");
    assert_eq!(claims["roles"], json!(["alumni"]));

    let mut permissions: Vec<&str> = claims["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    permissions.sort_unstable();
    assert_eq!(permissions, vec!["view_alumni", "view_directory"]);
}

#[tokio::test]
async fn test_login_response_includes_user() {
    let app = TestApp::new();
    app.register("bob", "manager").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "bob", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["user"]["username"], "bob");
    assert_eq!(response.body["data"]["user"]["roles"], json!(["manager"]));
    assert!(response.body["data"]["expires_at"].is_string());
}

#[tokio::test]
async fn test_unknown_role_falls_back_to_default() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "carol",
                "email": "carol@x.com",
                "password": PASSWORD,
                "confirm_password": PASSWORD,
                "selected_role": "astronaut",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["role"], "alumni");
}

#[tokio::test]
async fn test_register_rejects_mismatched_confirmation() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "dave",
                "email": "dave@x.com",
                "password": PASSWORD,
                "confirm_password": "secret2",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_register_rejects_duplicate_username() {
    let app = TestApp::new();
    app.register("erin", "alumni").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "erin",
                "email": "other@x.com",
                "password": PASSWORD,
                "confirm_password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "frank",
                "email": "frank@x.com",
                "password": "abc",
                "confirm_password": "abc",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.register("grace", "alumni").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "grace", "password": "wrongpass" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_nonexistent_user() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "nobody", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/auth/profile", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "NO_TOKEN");
}

#[tokio::test]
async fn test_garbage_token() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/auth/profile", None, Some("not-a-token"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_token_from_other_deployment_is_rejected() {
    let issuer = TestApp::new();
    let (_, token) = issuer.user_with_token("henry", "alumni").await;

    let mut config = alumni_core::config::AppConfig::default();
    config.database.provider = alumni_core::config::StoreProvider::Memory;
    config.auth.jwt_secret = "a-completely-different-signing-secret".to_string();
    let other = TestApp::with_config(config);

    let response = other
        .request("GET", "/api/auth/verify", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_profile_update_and_read_back() {
    let app = TestApp::new();
    let (_, token) = app.user_with_token("jack", "alumni").await;

    let response = app
        .request(
            "PUT",
            "/api/auth/profile",
            Some(json!({ "first_name": "Jack", "phone": "5551234567" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app.request("GET", "/api/auth/profile", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["first_name"], "Jack");
    assert_eq!(response.body["data"]["username"], "jack");
    assert!(response.body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let (_, token) = app.user_with_token("kate", "alumni").await;

    let response = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({
                "old_password": "wrong-old",
                "new_password": "newsecret",
                "confirm_password": "newsecret",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Old password is incorrect");

    let response = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({
                "old_password": PASSWORD,
                "new_password": "newsecret",
                "confirm_password": "newsecret",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    app.login("kate", "newsecret").await;
}

#[tokio::test]
async fn test_login_trims_username() {
    let app = TestApp::new();
    app.register("liam", "alumni").await;

    let token = app.login(" liam ", PASSWORD).await;

    let response = app.request("GET", "/api/auth/verify", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "liam");
}

#[tokio::test]
async fn test_register_username_fits_column() {
    let app = TestApp::new();
    let register = |username: String| {
        let email = format!("{}@x.com", &username[..5]);
        json!({
            "username": username,
            "email": email,
            "password": PASSWORD,
            "confirm_password": PASSWORD,
        })
    };

    let response = app
        .request("POST", "/api/auth/register", Some(register("m".repeat(50))), None)
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

    let response = app
        .request("POST", "/api/auth/register", Some(register("n".repeat(51))), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_profile_phone_fits_column() {
    let app = TestApp::new();
    let (_, token) = app.user_with_token("mona", "alumni").await;

    let response = app
        .request(
            "PUT",
            "/api/auth/profile",
            Some(json!({ "phone": "1".repeat(20) })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app
        .request(
            "PUT",
            "/api/auth/profile",
            Some(json!({ "phone": "1".repeat(21) })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}
