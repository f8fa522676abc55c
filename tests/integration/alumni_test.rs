//! Alumni directory endpoints and their per-method guards.

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::helpers::TestApp;

fn record(first: &str, last: &str, company: &str) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "email": format!("{}.{}@example.edu", first.to_lowercase(), last.to_lowercase()),
        "graduation_year": 2015,
        "degree": "BSc",
        "field_of_study": "Computer Science",
        "current_company": company,
        "city": "Hanoi",
        "country": "Vietnam",
    })
}

async fn create(app: &TestApp, token: &str, body: Value) -> String {
    let response = app.request("POST", "/api/alumni", Some(body), Some(token)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_reads_are_public() {
    let app = TestApp::new();
    let (_, member) = app.user_with_token("member", "alumni").await;
    let id = create(&app, &member, record("Linh", "Tran", "Acme")).await;

    let response = app.request("GET", "/api/alumni", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 1);

    let response = app.request("GET", &format!("/api/alumni/{id}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["first_name"], "Linh");
}

#[tokio::test]
async fn test_create_requires_token() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/alumni", Some(record("A", "B", "C")), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "NO_TOKEN");
}

#[tokio::test]
async fn test_guest_cannot_create() {
    let app = TestApp::new();
    let (_, guest) = app.user_with_token("visitor", "guest").await;

    let response = app
        .request("POST", "/api/alumni", Some(record("A", "B", "C")), Some(&guest))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "INSUFFICIENT_ROLE");
}

#[tokio::test]
async fn test_delete_needs_manage_alumni_permission() {
    let app = TestApp::new();
    let (_, member) = app.user_with_token("member", "alumni").await;
    let (_, manager) = app.user_with_token("boss", "manager").await;
    let id = create(&app, &member, record("Minh", "Le", "Globex")).await;

    let response = app
        .request("DELETE", &format!("/api/alumni/{id}"), None, Some(&member))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "PERMISSION_DENIED");

    let response = app
        .request("DELETE", &format!("/api/alumni/{id}"), None, Some(&manager))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", &format!("/api/alumni/{id}"), None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_replaces_fields() {
    let app = TestApp::new();
    let (_, manager) = app.user_with_token("boss", "manager").await;
    let id = create(&app, &manager, record("Nam", "Pham", "Initech")).await;

    let mut changed = record("Nam", "Pham", "Hooli");
    changed["graduation_year"] = json!(2018);
    let response = app
        .request("PUT", &format!("/api/alumni/{id}"), Some(changed), Some(&manager))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["current_company"], "Hooli");
    assert_eq!(response.body["data"]["graduation_year"], 2018);
}

#[tokio::test]
async fn test_invalid_record_is_rejected() {
    let app = TestApp::new();
    let (_, manager) = app.user_with_token("boss", "manager").await;

    let mut bad = record("Oanh", "Vu", "Umbrella");
    bad["graduation_year"] = json!(1850);
    let response = app
        .request("POST", "/api/alumni", Some(bad), Some(&manager))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new();
    let (_, manager) = app.user_with_token("boss", "manager").await;
    create(&app, &manager, record("Phuong", "Do", "Acme")).await;

    let response = app
        .request(
            "POST",
            "/api/alumni",
            Some(record("Phuong", "Do", "Other")),
            Some(&manager),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_and_pagination() {
    let app = TestApp::new();
    let (_, manager) = app.user_with_token("boss", "manager").await;
    create(&app, &manager, record("Quang", "Ngo", "Acme")).await;
    create(&app, &manager, record("Rin", "Ho", "acme labs")).await;
    create(&app, &manager, record("Son", "Bui", "Globex")).await;

    let response = app.request("GET", "/api/alumni/search?q=ACME", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 2);

    let response = app.request("GET", "/api/alumni/search?q=", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("GET", "/api/alumni?page=2&per_page=2", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["data"]["total"], 3);
    assert_eq!(response.body["data"]["total_pages"], 2);
}

#[tokio::test]
async fn test_statistics_are_public() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/alumni/statistics", None, None).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"], json!([]));

    let (_, manager) = app.user_with_token("boss", "manager").await;
    create(&app, &manager, record("Tam", "Vo", "Acme")).await;
    create(&app, &manager, record("Uyen", "Ly", "Globex")).await;

    let response = app.request("GET", "/api/alumni/statistics", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let stats = response.body["data"].as_array().unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["total_alumni"], 2);
    assert!(stats[0]["year"].is_i64());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["store"], "memory");
}
