//! REST routes under /api. Static segments take precedence over `/:path_segment`.

use crate::handlers::{auth, enquiry, profile, resource, sales, upload};
use crate::state::AppState;
use crate::upload::MAX_IMAGE_BYTES;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

/// Room for multipart framing around a maximum-size image.
const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 64 * 1024;

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        .route("/enquiries", get(enquiry::list).post(enquiry::submit))
        .route("/enquiries/:id", put(enquiry::update).delete(enquiry::delete))
        .route("/sales", get(sales::list).post(sales::create))
        .route("/business-profile", get(profile::get).put(profile::replace))
        .route(
            "/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/:path_segment", get(resource::list).post(resource::create))
        .route("/:path_segment/:id", put(resource::update).delete(resource::delete))
        .with_state(state)
}
