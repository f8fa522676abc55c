//! Role management endpoints and the admin guard in front of them.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_editor_role_permission_lifecycle() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;

    let response = app
        .request(
            "POST",
            "/api/roles",
            Some(json!({ "name": "editor", "permissions": ["manage_alumni"] })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let role_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            &format!("/api/roles/{role_id}/add-permission"),
            Some(json!({ "permission": "view_reports" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"]["permissions"],
        json!(["manage_alumni", "view_reports"])
    );

    // Adding again changes nothing.
    let response = app
        .request(
            "POST",
            &format!("/api/roles/{role_id}/add-permission"),
            Some(json!({ "permission": "view_reports" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/roles/{role_id}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let mut permissions: Vec<&str> = response.body["data"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    permissions.sort_unstable();
    assert_eq!(permissions, vec!["manage_alumni", "view_reports"]);

    let response = app
        .request(
            "POST",
            &format!("/api/roles/{role_id}/remove-permission"),
            Some(json!({ "permission": "manage_alumni" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["permissions"], json!(["view_reports"]));
}

#[tokio::test]
async fn test_duplicate_role_name_is_rejected() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;

    let response = app
        .request("POST", "/api/roles", Some(json!({ "name": "alumni" })), Some(&admin))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_built_in_roles_cannot_be_edited_or_deleted() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;
    let guest = app.role_id(&admin, "guest").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/roles/{guest}"),
            Some(json!({ "description": "changed" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "POLICY_VIOLATION");

    let response = app
        .request("DELETE", &format!("/api/roles/{guest}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "POLICY_VIOLATION");
}

#[tokio::test]
async fn test_deleting_custom_role_releases_holders() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;
    let member = app.register("member", "alumni").await;

    let response = app
        .request("POST", "/api/roles", Some(json!({ "name": "mentor" })), Some(&admin))
        .await;
    let mentor = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            &format!("/api/users/{member}/assign-role"),
            Some(json!({ "role_id": mentor })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app
        .request("GET", &format!("/api/roles/{mentor}/users"), None, Some(&admin))
        .await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);

    let response = app
        .request("DELETE", &format!("/api/roles/{mentor}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/users/{member}/roles"), None, Some(&admin))
        .await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["data"][0]["name"], "alumni");
}

#[tokio::test]
async fn test_unknown_role_is_not_found() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;

    let response = app
        .request(
            "GET",
            &format!("/api/roles/{}", uuid::Uuid::new_v4()),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_admin_is_refused_with_role_code() {
    let app = TestApp::new();
    let (_, manager) = app.user_with_token("boss", "manager").await;

    let response = app.request("GET", "/api/roles", None, Some(&manager)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "INSUFFICIENT_ROLE");
}

#[tokio::test]
async fn test_roles_require_a_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/roles", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "NO_TOKEN");
}

#[tokio::test]
async fn test_role_name_fits_column() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;

    let response = app
        .request(
            "POST",
            "/api/roles",
            Some(json!({ "name": "r".repeat(51) })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");

    let response = app
        .request(
            "POST",
            "/api/roles",
            Some(json!({ "name": "r".repeat(50) })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let role_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/roles/{role_id}"),
            Some(json!({ "name": "s".repeat(51) })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}
