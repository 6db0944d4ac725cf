//! Process settings read from the environment (and `.env` when present).

use crate::error::ConfigError;
use crate::session::MAX_SESSION_TTL_HOURS;
use std::path::PathBuf;

const DEV_SESSION_SECRET: &str = "boutique-admin-dev-secret-change-me";

#[derive(Clone, Debug)]
pub struct Settings {
    /// Unset means the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub session_secret: String,
    pub session_cookie: String,
    pub session_ttl_hours: i64,
    pub admin_password: Option<String>,
    pub image_bucket: Option<String>,
    pub image_public_base_url: Option<String>,
    pub public_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let session_secret = match get("SESSION_SECRET") {
            Some(s) => s,
            None => {
                tracing::warn!("SESSION_SECRET is not set; using the development secret");
                DEV_SESSION_SECRET.to_string()
            }
        };
        let session_ttl_hours = parse_or(get("SESSION_TTL_HOURS"), "SESSION_TTL_HOURS", 12i64)?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            return Err(ConfigError::InvalidSetting {
                key: "SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
            });
        }

        Ok(Settings {
            database_url: get("DATABASE_URL"),
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5u32)?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            session_secret,
            session_cookie: get("SESSION_COOKIE").unwrap_or_else(|| "admin_session".into()),
            session_ttl_hours,
            admin_password: get("ADMIN_PASSWORD"),
            image_bucket: get("IMAGE_BUCKET"),
            image_public_base_url: get("IMAGE_PUBLIC_BASE_URL"),
            public_dir: get("PUBLIC_DIR").map(PathBuf::from),
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidSetting { key, value: v }),
    }
}
