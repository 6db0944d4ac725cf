//! Enquiries: public contact-form submissions, triaged by the admin.

use crate::error::AppError;
use crate::extractors::{AdminSession, JsonBody};
use crate::model::ENQUIRIES;
use crate::response::{success_created, success_done, success_ok};
use crate::service::CrudService;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

pub async fn list(_session: AdminSession, State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(success_ok(CrudService::list(state.store.as_ref(), &ENQUIRIES).await?))
}

/// Contact form. No session; status always starts as `pending`.
pub async fn submit(State(state): State<AppState>, JsonBody(mut body): JsonBody) -> Result<impl IntoResponse, AppError> {
    if let Some(obj) = body.as_object_mut() {
        obj.remove("status");
        obj.remove("notes");
    }
    let row = CrudService::create(state.store.as_ref(), &ENQUIRIES, &body).await?;
    Ok(success_created(row))
}

/// Sets `status` and `notes`.
pub async fn update(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let row = CrudService::update(state.store.as_ref(), &ENQUIRIES, &id, &body).await?;
    Ok(success_ok(row))
}

pub async fn delete(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    CrudService::delete(state.store.as_ref(), &ENQUIRIES, &id).await?;
    Ok(success_done())
}
