mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use boutique_admin::upload::MAX_IMAGE_BYTES;
use common::{body_json, json_request, multipart_file, FakeImageHost, TestApp, PASSWORD};
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;

fn upload_request(cookie: Option<&str>, field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let (form_type, body) = multipart_file(field, "photo", content_type, data);
    let mut req = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, form_type);
    if let Some(c) = cookie {
        req = req.header(header::COOKIE, c);
    }
    req.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn business_profile_is_public_to_read() {
    let app = TestApp::new();
    let (status, empty) = app.anonymous("GET", "/api/business-profile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!({ "success": true, "data": {} }));

    let profile = json!({ "shopName": "Adire House", "phone": "0807", "hours": { "sat": "10-4" } });
    let (status, _) = app.anonymous("PUT", "/api/business-profile", Some(profile.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, saved) = app.call("PUT", "/api/business-profile", Some(profile.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["data"], profile);

    let (_, read) = app.anonymous("GET", "/api/business-profile", None).await;
    assert_eq!(read["data"], profile);

    let (status, _) = app.call("PUT", "/api/business-profile", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_sets_a_working_session_cookie() {
    let app = TestApp::new();

    let (status, err) = app.anonymous("POST", "/api/auth/login", Some(json!({ "password": "wrong" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["success"], false);

    let resp = app
        .send(json_request("POST", "/api/auth/login", Some(json!({ "password": PASSWORD })), None))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("admin_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert_eq!(body_json(resp).await["data"]["authenticated"], true);

    let cookie = set_cookie.split(';').next().unwrap();
    let resp = app.send(json_request("GET", "/api/auth/session", None, Some(cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["subject"], "admin");

    let resp = app.send(json_request("GET", "/api/customers", None, Some(cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.send(json_request("POST", "/api/auth/logout", None, Some(cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.starts_with("admin_session=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn login_is_disabled_without_a_password() {
    let app = TestApp::without_password();
    let (status, _) = app.anonymous("POST", "/api/auth/login", Some(json!({ "password": "" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_without_a_host_is_unavailable() {
    let app = TestApp::new();
    let resp = app.send(upload_request(Some(app.cookie()), "file", "image/png", b"png")).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(resp).await["success"], false);
}

#[tokio::test]
async fn upload_stores_images_and_returns_the_url() {
    let host = Arc::new(FakeImageHost::default());
    let app = TestApp::with_images(host.clone());

    let resp = app.send(upload_request(Some(app.cookie()), "file", "image/png", b"\x89PNG fake")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let url = body_json(resp).await["data"]["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("https://images.test/uploads/"));
    assert!(url.ends_with(".png"));

    let stored = host.stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].1, 9);
    assert_eq!(stored[0].2, "image/png");
}

#[tokio::test]
async fn upload_rejects_before_contacting_the_host() {
    let host = Arc::new(FakeImageHost::default());
    let app = TestApp::with_images(host.clone());

    let resp = app.send(upload_request(Some(app.cookie()), "file", "application/pdf", b"%PDF")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.send(upload_request(Some(app.cookie()), "file", "image/jpeg", b"")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let oversize = vec![0u8; MAX_IMAGE_BYTES + 1];
    let resp = app.send(upload_request(Some(app.cookie()), "file", "image/jpeg", &oversize)).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let resp = app.send(upload_request(Some(app.cookie()), "attachment", "image/png", b"png")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.send(upload_request(None, "file", "image/png", b"png")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert!(host.stored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn admin_pages_are_gated_by_cookie_presence() {
    let app = TestApp::new();

    let resp = app.send(json_request("GET", "/admin/dashboard", None, None)).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[header::LOCATION], "/admin/login");

    for path in ["//admin/dashboard", "/./admin/dashboard", "/%61dmin/dashboard"] {
        let resp = app.send(json_request("GET", path, None, None)).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
        assert_eq!(resp.headers()[header::LOCATION], "/admin/login");
    }

    let resp = app.send(json_request("GET", "/admin/login", None, Some("admin_session=stale"))).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[header::LOCATION], "/admin/dashboard");

    let resp = app.send(json_request("GET", "/admin/dashboard", None, Some("admin_session=stale"))).await;
    assert_ne!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn static_admin_pages_cannot_be_reached_by_path_tricks() {
    let site = tempfile::tempdir().unwrap();
    std::fs::create_dir(site.path().join("admin")).unwrap();
    std::fs::write(site.path().join("admin").join("dashboard"), "dashboard").unwrap();
    std::fs::write(site.path().join("index.html"), "welcome").unwrap();
    let app = TestApp::with_public_dir(site.path().to_path_buf());

    for path in ["/admin/dashboard", "//admin/dashboard", "/./admin/dashboard", "/%61dmin/dashboard"] {
        let resp = app.send(json_request("GET", path, None, None)).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
        assert_eq!(resp.headers()[header::LOCATION], "/admin/login");
    }

    let resp = app.send(json_request("GET", "/admin/dashboard", None, Some(app.cookie()))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"dashboard");

    let resp = app.send(json_request("GET", "/index.html", None, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_and_readiness() {
    let app = TestApp::new();
    let (status, body) = app.anonymous("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = app.anonymous("GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "ok");

    let (_, body) = app.anonymous("GET", "/version", None).await;
    assert_eq!(body["name"], "boutique-admin");
}
