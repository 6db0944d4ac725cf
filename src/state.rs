//! Shared application state for all routes.

use crate::session::SessionKeys;
use crate::store::RecordStore;
use crate::upload::ImageHost;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub sessions: SessionKeys,
    /// `None` disables uploads (503).
    pub images: Option<Arc<dyn ImageHost>>,
    /// `None` disables login.
    pub admin_password: Option<String>,
}
