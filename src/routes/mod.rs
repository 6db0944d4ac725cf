//! Router assembly.

mod api;
mod common;

pub use api::api_routes;
pub use common::common_routes;

use crate::gate::{route_gate, GateConfig};
use crate::state::AppState;
use axum::{middleware, Router};
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Full application: common routes, `/api`, optional static site, all behind the admin gate.
pub fn app(state: AppState, gate: GateConfig, public_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", api_routes(state));
    if let Some(dir) = public_dir {
        router = router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }
    router
        .layer(middleware::from_fn_with_state(gate, route_gate))
        .layer(TraceLayer::new_for_http())
}
