//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
}

/// Body-less success, used by deletes and logout.
#[derive(Serialize)]
pub struct Done {
    pub success: bool,
}

pub fn success_created<T: Serialize>(data: T) -> (StatusCode, Json<Success<T>>) {
    (
        StatusCode::CREATED,
        Json(Success {
            success: true,
            data,
        }),
    )
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<Success<T>>) {
    (
        StatusCode::OK,
        Json(Success {
            success: true,
            data,
        }),
    )
}

pub fn success_done() -> (StatusCode, Json<Done>) {
    (StatusCode::OK, Json(Done { success: true }))
}
