use crate::error::AppError;
use crate::extractors::{AdminSession, JsonBody};
use crate::model::SALES;
use crate::response::{success_created, success_ok};
use crate::service::{CrudService, SalesQuery};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

/// GET /api/sales?year=YYYY&month=M
pub async fn list(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.into_filter()?;
    Ok(success_ok(CrudService::list_sales(state.store.as_ref(), &filter).await?))
}

pub async fn create(
    _session: AdminSession,
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let row = CrudService::create(state.store.as_ref(), &SALES, &body).await?;
    Ok(success_created(row))
}
