//! CRUD handlers for the resources addressed by path segment (customers, suppliers, catalogues, inventory).

use crate::error::AppError;
use crate::extractors::{AdminSession, JsonBody};
use crate::model::{resource_by_path, ResourceSpec};
use crate::response::{success_created, success_done, success_ok};
use crate::service::CrudService;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

fn resource(path_segment: &str) -> Result<&'static ResourceSpec, AppError> {
    resource_by_path(path_segment).ok_or_else(|| AppError::NotFound(format!("unknown resource: {}", path_segment)))
}

pub async fn list(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let spec = resource(&path_segment)?;
    let rows = CrudService::list(state.store.as_ref(), spec).await?;
    Ok(success_ok(rows))
}

pub async fn create(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let spec = resource(&path_segment)?;
    let row = CrudService::create(state.store.as_ref(), spec, &body).await?;
    Ok(success_created(row))
}

pub async fn update(
    _session: AdminSession,
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let spec = resource(&path_segment)?;
    let row = CrudService::update(state.store.as_ref(), spec, &id, &body).await?;
    Ok(success_ok(row))
}

pub async fn delete(
    _session: AdminSession,
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let spec = resource(&path_segment)?;
    CrudService::delete(state.store.as_ref(), spec, &id).await?;
    Ok(success_done())
}
