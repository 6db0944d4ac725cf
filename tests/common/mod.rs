#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use boutique_admin::{app, AppError, AppState, GateConfig, ImageHost, MemoryStore, SessionKeys};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse";
pub const SECRET: &[u8] = b"integration-test-secret";
pub const COOKIE: &str = "admin_session";

/// Records every stored image instead of talking to a bucket.
#[derive(Default)]
pub struct FakeImageHost {
    pub stored: Mutex<Vec<(String, usize, String)>>,
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn store(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        self.stored
            .lock()
            .unwrap()
            .push((key.to_string(), bytes.len(), content_type.to_string()));
        Ok(format!("https://images.test/{}", key))
    }
}

pub struct TestApp {
    state: AppState,
    public_dir: Option<PathBuf>,
    cookie: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(None, Some(PASSWORD.to_string()))
    }

    /// Also serves static files from `dir` behind the admin gate.
    pub fn with_public_dir(dir: PathBuf) -> Self {
        let mut app = Self::new();
        app.public_dir = Some(dir);
        app
    }

    pub fn with_images(host: Arc<dyn ImageHost>) -> Self {
        Self::build(Some(host), Some(PASSWORD.to_string()))
    }

    pub fn without_password() -> Self {
        Self::build(None, None)
    }

    fn build(images: Option<Arc<dyn ImageHost>>, admin_password: Option<String>) -> Self {
        let sessions = SessionKeys::new(SECRET, 1, COOKIE);
        let cookie = format!("{}={}", COOKIE, sessions.issue("admin").unwrap());
        let state = AppState {
            store: Arc::new(MemoryStore::new()),
            sessions,
            images,
            admin_password,
        };
        TestApp {
            state,
            public_dir: None,
            cookie,
        }
    }

    fn router(&self) -> Router {
        app(self.state.clone(), GateConfig::default(), self.public_dir.clone())
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router().oneshot(req).await.unwrap()
    }

    /// JSON request carrying a valid session cookie.
    pub async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let req = json_request(method, uri, body, Some(&self.cookie));
        let resp = self.send(req).await;
        (resp.status(), body_json(resp).await)
    }

    pub async fn anonymous(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let resp = self.send(json_request(method, uri, body, None)).await;
        (resp.status(), body_json(resp).await)
    }
}

pub fn json_request(method: &str, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Request<Body> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
        req = req.header(header::COOKIE, c);
    }
    match body {
        Some(v) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    }
}

/// Single-file multipart body; returns the content type header value and the bytes.
pub fn multipart_file(field: &str, filename: &str, content_type: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "boutique-test-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// Response body as JSON; `Null` when empty.
pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
