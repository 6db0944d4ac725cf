//! Boutique back-office server: reads settings, picks a store, serves the router.

use boutique_admin::{
    app, ensure_database_exists, ensure_tables, validate_model, AppState, GateConfig, ImageHost, MemoryStore,
    PgStore, RecordStore, S3ImageHost, SessionKeys, Settings, ALL_RESOURCES,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "boutique_admin=info,boutique_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let settings = Settings::from_env()?;
    validate_model(ALL_RESOURCES)?;

    let store: Arc<dyn RecordStore> = match &settings.database_url {
        Some(url) => {
            ensure_database_exists(url).await?;
            let pool = PgPoolOptions::new()
                .max_connections(settings.db_max_connections)
                .connect(url)
                .await?;
            ensure_tables(&pool).await?;
            tracing::info!(max_connections = settings.db_max_connections, "connected to PostgreSQL");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; records are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let images: Option<Arc<dyn ImageHost>> = match &settings.image_bucket {
        Some(bucket) => {
            let host: Arc<dyn ImageHost> =
                Arc::new(S3ImageHost::from_env(bucket.clone(), settings.image_public_base_url.clone()).await);
            tracing::info!(bucket = %bucket, "image uploads enabled");
            Some(host)
        }
        None => {
            tracing::warn!("IMAGE_BUCKET is not set; image uploads are disabled");
            None
        }
    };

    if settings.admin_password.is_none() {
        tracing::warn!("ADMIN_PASSWORD is not set; admin login is disabled");
    }

    let state = AppState {
        store,
        sessions: SessionKeys::new(
            settings.session_secret.as_bytes(),
            settings.session_ttl_hours,
            settings.session_cookie.clone(),
        ),
        images,
        admin_password: settings.admin_password.clone(),
    };
    let router = app(
        state,
        GateConfig::with_cookie_name(settings.session_cookie.clone()),
        settings.public_dir.clone(),
    );

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
