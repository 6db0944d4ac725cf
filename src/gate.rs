//! Cookie-presence gate in front of the admin pages. Token content is checked by handlers, not here.

use crate::session::cookie_value;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

#[derive(Clone, Debug)]
pub struct GateConfig {
    pub protected_prefix: String,
    pub login_path: String,
    pub dashboard_path: String,
    pub cookie_name: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            protected_prefix: "/admin".into(),
            login_path: "/admin/login".into(),
            dashboard_path: "/admin/dashboard".into(),
            cookie_name: "admin_session".into(),
        }
    }
}

impl GateConfig {
    pub fn with_cookie_name(cookie_name: impl Into<String>) -> Self {
        GateConfig {
            cookie_name: cookie_name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

/// The path a file server would resolve: percent-decoded, `.` and empty segments dropped, `..` applied.
/// `None` when the path does not decode to UTF-8.
pub fn canonical_path(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(|c: char| c == '/' || c == '\\') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    Some(format!("/{}", segments.join("/")))
}

fn normalized(path: &str) -> String {
    path.trim_end_matches('/').to_ascii_lowercase()
}

fn is_login(config: &GateConfig, path: &str) -> bool {
    path.to_ascii_lowercase() == normalized(&config.login_path)
}

fn is_protected(config: &GateConfig, path: &str) -> bool {
    let prefix = normalized(&config.protected_prefix);
    let path = path.to_ascii_lowercase();
    path == prefix || path.starts_with(&format!("{}/", prefix))
}

/// Undecodable paths are treated as protected.
pub fn decide(config: &GateConfig, path: &str, has_session_cookie: bool) -> GateDecision {
    let Some(path) = canonical_path(path) else {
        return if has_session_cookie {
            GateDecision::Allow
        } else {
            GateDecision::Redirect(config.login_path.clone())
        };
    };
    if is_login(config, &path) {
        return if has_session_cookie {
            GateDecision::Redirect(config.dashboard_path.clone())
        } else {
            GateDecision::Allow
        };
    }
    if is_protected(config, &path) && !has_session_cookie {
        return GateDecision::Redirect(config.login_path.clone());
    }
    GateDecision::Allow
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn route_gate(State(config): State<GateConfig>, req: Request, next: Next) -> Response {
    let has_cookie = cookie_value(req.headers(), &config.cookie_name).is_some();
    match decide(&config, req.uri().path(), has_cookie) {
        GateDecision::Allow => next.run(req).await,
        GateDecision::Redirect(to) => {
            tracing::debug!(path = %req.uri().path(), to = %to, "gate redirect");
            Redirect::temporary(&to).into_response()
        }
    }
}
