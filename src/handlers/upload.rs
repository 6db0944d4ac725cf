//! POST /api/upload: multipart field `file`, answered with the hosted image URL.

use crate::error::AppError;
use crate::extractors::AdminSession;
use crate::response::success_ok;
use crate::state::AppState;
use crate::upload::{ensure_image_type, ensure_size, object_key, validate_image};
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Image must be 10 MB or smaller".into())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

pub async fn upload_image(
    _session: AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let host = state
        .images
        .clone()
        .ok_or_else(|| AppError::Unavailable("Image uploads are not configured".into()))?;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().unwrap_or("").to_string();
        ensure_image_type(&content_type)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            ensure_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }
        validate_image(&content_type, bytes.len())?;

        let key = object_key(&content_type);
        let url = host.store(&key, bytes, &content_type).await?;
        return Ok(success_ok(json!({ "url": url })));
    }
    Err(AppError::BadRequest("No file uploaded".into()))
}
