//! User administration and the role assignment ledger over HTTP.

use axum::http::StatusCode;
use serde_json::json;

use alumni_core::config::AdminFloor;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_staff_can_list_and_read_users() {
    let app = TestApp::new();
    let (_, manager) = app.user_with_token("boss", "manager").await;
    let member = app.register("member", "alumni").await;

    let response = app.request("GET", "/api/users", None, Some(&manager)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 2);

    let response = app
        .request("GET", &format!("/api/users/{member}"), None, Some(&manager))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "member");
    assert_eq!(response.body["data"]["roles"][0]["name"], "alumni");
}

#[tokio::test]
async fn test_alumni_cannot_administer_users() {
    let app = TestApp::new();
    let (_, member) = app.user_with_token("member", "alumni").await;

    let response = app.request("GET", "/api/users", None, Some(&member)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "INSUFFICIENT_ROLE");
}

#[tokio::test]
async fn test_manager_cannot_assign_roles() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;
    let (_, manager) = app.user_with_token("boss", "manager").await;
    let member = app.register("member", "alumni").await;
    let admin_role = app.role_id(&admin, "admin").await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/{member}/assign-role"),
            Some(json!({ "role_id": admin_role })),
            Some(&manager),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "INSUFFICIENT_ROLE");
}

#[tokio::test]
async fn test_assignment_records_assigner_and_rejects_duplicates() {
    let app = TestApp::new();
    let (root, admin) = app.user_with_token("root", "admin").await;
    let member = app.register("member", "alumni").await;
    let manager_role = app.role_id(&admin, "manager").await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/{member}/assign-role"),
            Some(json!({ "role_id": manager_role })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["assigned_by"], root.to_string());

    let response = app
        .request(
            "POST",
            &format!("/api/users/{member}/assign-role"),
            Some(json!({ "role_id": manager_role })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "User already has this role");
}

#[tokio::test]
async fn test_new_role_reaches_token_after_next_login() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;
    let (member, stale) = app.user_with_token("member", "alumni").await;
    let manager_role = app.role_id(&admin, "manager").await;

    app.request(
        "POST",
        &format!("/api/users/{member}/assign-role"),
        Some(json!({ "role_id": manager_role })),
        Some(&admin),
    )
    .await;

    // Existing tokens keep the roles they were issued with.
    let response = app.request("GET", "/api/users", None, Some(&stale)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let fresh = app.login("member", PASSWORD).await;
    let response = app.request("GET", "/api/users", None, Some(&fresh)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_remove_sole_admin_role_is_refused() {
    let app = TestApp::new();
    let (root, admin) = app.user_with_token("root", "admin").await;
    let admin_role = app.role_id(&admin, "admin").await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/{root}/remove-role"),
            Some(json!({ "role_id": admin_role })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Cannot remove last admin role");
}

#[tokio::test]
async fn test_remove_unheld_role_is_not_found() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;
    let member = app.register("member", "alumni").await;
    let guest_role = app.role_id(&admin, "guest").await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/{member}/remove-role"),
            Some(json!({ "role_id": guest_role })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_per_user_floor_allows_stripping_last_admin_with_other_roles() {
    let app = TestApp::with_admin_floor(AdminFloor::PerUser);
    let (root, admin) = app.user_with_token("root", "admin").await;
    let admin_role = app.role_id(&admin, "admin").await;
    let alumni_role = app.role_id(&admin, "alumni").await;

    app.request(
        "POST",
        &format!("/api/users/{root}/assign-role"),
        Some(json!({ "role_id": alumni_role })),
        Some(&admin),
    )
    .await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/{root}/remove-role"),
            Some(json!({ "role_id": admin_role })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

#[tokio::test]
async fn test_system_floor_keeps_one_admin() {
    let app = TestApp::with_admin_floor(AdminFloor::System);
    let (root, admin) = app.user_with_token("root", "admin").await;
    let admin_role = app.role_id(&admin, "admin").await;
    let alumni_role = app.role_id(&admin, "alumni").await;

    app.request(
        "POST",
        &format!("/api/users/{root}/assign-role"),
        Some(json!({ "role_id": alumni_role })),
        Some(&admin),
    )
    .await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/{root}/remove-role"),
            Some(json!({ "role_id": admin_role })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        "Cannot remove the only remaining administrator"
    );
}

#[tokio::test]
async fn test_update_user_validates_phone() {
    let app = TestApp::new();
    let (_, admin) = app.user_with_token("root", "admin").await;
    let member = app.register("member", "alumni").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{member}"),
            Some(json!({ "phone": "12345" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{member}"),
            Some(json!({ "phone": "5551234567", "is_active": false })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_active"], false);

    // Deactivated users can no longer log in.
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "member", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new();
    let (root, admin) = app.user_with_token("root", "admin").await;
    let member = app.register("member", "alumni").await;

    let response = app
        .request("DELETE", &format!("/api/users/{root}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Cannot delete admin user");

    let response = app
        .request("DELETE", &format!("/api/users/{member}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/users/{member}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
