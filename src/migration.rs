//! Bootstrap DDL derived from the resource model. Idempotent: existing tables are left as they are.

use crate::error::AppError;
use crate::model::{FieldKind, FieldSpec, ResourceSpec, ALL_RESOURCES};
use crate::store::KV_TABLE;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_def(f: &FieldSpec) -> String {
    let name = quote(f.column);
    match f.kind {
        FieldKind::Text if f.nullable => format!("{} TEXT", name),
        FieldKind::Text => format!("{} TEXT NOT NULL DEFAULT ''", name),
        FieldKind::Integer => format!("{} BIGINT NOT NULL DEFAULT 0", name),
        FieldKind::Decimal => format!("{} DOUBLE PRECISION NOT NULL DEFAULT 0", name),
        FieldKind::Date => format!("{} DATE NOT NULL DEFAULT CURRENT_DATE", name),
        FieldKind::Choice(values) => {
            let allowed: Vec<String> = values.iter().map(|v| format!("'{}'", v.replace('\'', "''"))).collect();
            format!(
                "{} TEXT NOT NULL DEFAULT {} CHECK ({} IN ({}))",
                name,
                allowed[0],
                name,
                allowed.join(", ")
            )
        }
        FieldKind::IdList => format!("{} BIGINT[] NOT NULL DEFAULT '{{}}'", name),
        FieldKind::TextList => format!("{} TEXT[] NOT NULL DEFAULT '{{}}'", name),
        FieldKind::JsonList => format!("{} JSONB NOT NULL DEFAULT '[]'", name),
    }
}

pub fn create_table_sql(spec: &ResourceSpec, table: &str) -> String {
    let mut cols = vec!["\"id\" BIGSERIAL PRIMARY KEY".to_string()];
    cols.extend(spec.fields.iter().map(column_def));
    cols.push("\"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW()".into());
    cols.push("\"updated_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW()".into());
    format!("CREATE TABLE IF NOT EXISTS {} (\n    {}\n)", quote(table), cols.join(",\n    "))
}

/// Create one table per table-backed resource plus the key/value table.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for spec in ALL_RESOURCES {
        if let Some(table) = spec.table() {
            sqlx::query(&create_table_sql(spec, table)).execute(pool).await?;
            tracing::debug!(table, "table ready");
        }
    }
    let kv_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            namespace TEXT NOT NULL,
            key TEXT NOT NULL,
            value JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (namespace, key)
        )
        "#,
        KV_TABLE
    );
    sqlx::query(&kv_ddl).execute(pool).await?;
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url.rfind('/').ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres{}", base, query);
    Ok((admin_url, db_name.to_string()))
}
