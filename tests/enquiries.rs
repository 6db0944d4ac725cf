mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn submit(app: &TestApp) -> String {
    let (status, created) = app
        .anonymous(
            "POST",
            "/api/enquiries",
            Some(json!({ "name": "Funke", "phone": "08055550000", "message": "Do you ship to Abuja?", "status": "closed" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    created["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn contact_form_is_public_and_starts_pending() {
    let app = TestApp::new();
    let id = submit(&app).await;

    let (status, listed) = app.call("GET", "/api/enquiries", None).await;
    assert_eq!(status, StatusCode::OK);
    let first = &listed["data"][0];
    assert_eq!(first["id"], Value::String(id));
    assert_eq!(first["status"], "pending");
    assert_eq!(first["notes"], "");

    let (status, _) = app.anonymous("GET", "/api/enquiries", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn status_must_be_a_known_value() {
    let app = TestApp::new();
    let id = submit(&app).await;

    let (status, err) = app
        .call("PUT", &format!("/api/enquiries/{}", id), Some(json!({ "status": "archived" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["success"], false);
    assert!(err["message"].as_str().unwrap().starts_with("status must be one of"));

    let (status, err) = app.call("PUT", &format!("/api/enquiries/{}", id), Some(json!({ "notes": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["message"], "status is required");
}

#[tokio::test]
async fn update_without_notes_clears_them() {
    let app = TestApp::new();
    let id = submit(&app).await;

    let (status, updated) = app
        .call("PUT", &format!("/api/enquiries/{}", id), Some(json!({ "status": "contacted", "notes": "called back" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["notes"], "called back");

    let (status, updated) = app
        .call("PUT", &format!("/api/enquiries/{}", id), Some(json!({ "status": "resolved" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["status"], "resolved");
    assert_eq!(updated["data"]["notes"], "");
    assert_eq!(updated["data"]["message"], "Do you ship to Abuja?");
}

#[tokio::test]
async fn non_numeric_ids_are_not_found() {
    let app = TestApp::new();
    submit(&app).await;

    let (status, err) = app
        .call("PUT", "/api/enquiries/abc", Some(json!({ "status": "resolved" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err, json!({ "success": false, "message": "Enquiry not found" }));

    let (status, _) = app.call("DELETE", "/api/enquiries/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call("DELETE", "/api/enquiries/424242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_the_enquiry() {
    let app = TestApp::new();
    let id = submit(&app).await;

    let (status, _) = app.anonymous("DELETE", &format!("/api/enquiries/{}", id), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.call("DELETE", &format!("/api/enquiries/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
    let (_, listed) = app.call("GET", "/api/enquiries", None).await;
    assert_eq!(listed["data"], json!([]));
}
