//! Admin login/logout. The session is a signed token in an HttpOnly cookie.

use crate::error::AppError;
use crate::extractors::{AdminSession, JsonBody};
use crate::response::{success_done, success_ok};
use crate::state::AppState;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use chrono::{DateTime, SecondsFormat};
use serde_json::{json, Value};
use subtle::ConstantTimeEq;

const ADMIN_SUBJECT: &str = "admin";

fn expires_at(exp: i64) -> Value {
    DateTime::from_timestamp(exp, 0)
        .map(|t| Value::String(t.to_rfc3339_opts(SecondsFormat::Secs, true)))
        .unwrap_or(Value::Null)
}

pub async fn login(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<impl IntoResponse, AppError> {
    let Some(expected) = state.admin_password.as_deref() else {
        tracing::warn!("login attempted but ADMIN_PASSWORD is not set");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };
    let given = body.get("password").and_then(Value::as_str).unwrap_or("");
    if !bool::from(given.as_bytes().ct_eq(expected.as_bytes())) {
        tracing::warn!("rejected admin login");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = state.sessions.issue(ADMIN_SUBJECT)?;
    let claims = state.sessions.verify(&token)?;
    let cookie = state.sessions.session_cookie(token);
    tracing::info!("admin signed in");
    Ok((
        [(SET_COOKIE, cookie.to_string())],
        success_ok(json!({ "authenticated": true, "expiresAt": expires_at(claims.exp) })),
    ))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    ([(SET_COOKIE, state.sessions.removal_cookie().to_string())], success_done())
}

pub async fn session(session: AdminSession) -> impl IntoResponse {
    success_ok(json!({
        "authenticated": true,
        "subject": session.subject,
        "expiresAt": expires_at(session.expires_at),
    }))
}
