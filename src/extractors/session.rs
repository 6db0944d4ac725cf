//! Extract and verify the admin session from the session cookie.

use crate::error::AppError;
use crate::session::cookie_value;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// A verified admin session. Handlers that take this reject anonymous callers with 401.
#[derive(Clone, Debug)]
pub struct AdminSession {
    pub subject: String,
    pub expires_at: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, state.sessions.cookie_name())
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;
        let claims = state.sessions.verify(&token)?;
        Ok(AdminSession {
            subject: claims.sub,
            expires_at: claims.exp,
        })
    }
}
