//! Business profile singleton. Readable by the public site, replaced from the admin.

use crate::error::AppError;
use crate::extractors::{AdminSession, JsonBody};
use crate::response::success_ok;
use crate::service::CrudService;
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

pub async fn get(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(success_ok(CrudService::profile(state.store.as_ref()).await?))
}

pub async fn replace(
    _session: AdminSession,
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_ok(CrudService::replace_profile(state.store.as_ref(), body).await?))
}
