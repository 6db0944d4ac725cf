//! Boutique back-office: REST resources over PostgreSQL, an admin route gate, session auth and image upload.

pub mod case;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod session;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;
pub mod upload;

pub use error::{AppError, ConfigError};
pub use gate::{GateConfig, GateDecision};
pub use migration::{ensure_database_exists, ensure_tables};
pub use model::{validate_model, ALL_RESOURCES};
pub use routes::app;
pub use service::CrudService;
pub use session::SessionKeys;
pub use settings::Settings;
pub use state::AppState;
pub use store::{MemoryStore, PgStore, RecordStore};
pub use upload::{ImageHost, S3ImageHost};
