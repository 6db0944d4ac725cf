//! PostgreSQL store: table-backed resources through the SQL builder, the rest in `kv_records`.

use super::{RecordId, RecordStore, Row};
use crate::error::AppError;
use crate::model::{FieldKind, ResourceSpec};
use crate::service::normalize::format_timestamp;
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row as _};

/// Key/value table shared by the JSON-backed resources and singleton documents.
pub const KV_TABLE: &str = "kv_records";
const DOCUMENTS_NAMESPACE: &str = "_documents";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    async fn fetch_many(&self, spec: &ResourceSpec, q: QueryBuf) -> Result<Vec<Row>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query(&sql);
        for p in params {
            query = query.bind(p);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(|r| decode_table_row(spec, r)).collect()
    }

    async fn fetch_optional(&self, spec: &ResourceSpec, q: QueryBuf) -> Result<Option<Row>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query(&sql);
        for p in params {
            query = query.bind(p);
        }
        let row = query.fetch_optional(&self.pool).await?;
        row.map(|r| decode_table_row(spec, &r)).transpose()
    }
}

fn decode_table_row(spec: &ResourceSpec, row: &PgRow) -> Result<Row, AppError> {
    let mut out = Row::new();
    out.insert("id".into(), Value::Number(row.try_get::<i64, _>("id")?.into()));
    for f in spec.fields {
        let col = f.column;
        let v = match f.kind {
            FieldKind::Text | FieldKind::Choice(_) => row.try_get::<Option<String>, _>(col)?.map(Value::String),
            FieldKind::Integer => row.try_get::<Option<i64>, _>(col)?.map(|n| Value::Number(n.into())),
            FieldKind::Decimal => row
                .try_get::<Option<f64>, _>(col)?
                .and_then(Number::from_f64)
                .map(Value::Number),
            FieldKind::Date => row
                .try_get::<Option<NaiveDate>, _>(col)?
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
            FieldKind::IdList => row
                .try_get::<Option<Vec<i64>>, _>(col)?
                .map(|ids| Value::Array(ids.into_iter().map(|i| Value::Number(i.into())).collect())),
            FieldKind::TextList => row
                .try_get::<Option<Vec<String>>, _>(col)?
                .map(|v| Value::Array(v.into_iter().map(Value::String).collect())),
            FieldKind::JsonList => row.try_get::<Option<Value>, _>(col)?,
        };
        out.insert(col.to_string(), v.unwrap_or(Value::Null));
    }
    insert_timestamps(&mut out, row)?;
    Ok(out)
}

/// `key, value, created_at, updated_at` from `kv_records` as a row.
fn decode_kv_row(row: &PgRow) -> Result<Row, AppError> {
    let mut out = match row.try_get::<Value, _>("value")? {
        Value::Object(m) => m,
        _ => Row::new(),
    };
    out.insert("id".into(), Value::String(row.try_get::<String, _>("key")?));
    insert_timestamps(&mut out, row)?;
    Ok(out)
}

fn insert_timestamps(out: &mut Row, row: &PgRow) -> Result<(), AppError> {
    for col in ["created_at", "updated_at"] {
        let t: DateTime<Utc> = row.try_get(col)?;
        out.insert(col.to_string(), Value::String(format_timestamp(t)));
    }
    Ok(())
}

fn kv_key(id: &RecordId) -> String {
    id.to_string()
}

#[async_trait]
impl RecordStore for PgStore {
    async fn list(&self, spec: &'static ResourceSpec) -> Result<Vec<Row>, AppError> {
        if let Some(table) = spec.table() {
            return self.fetch_many(spec, sql::select_list(spec, table)).await;
        }
        let rows = sqlx::query(&format!(
            "SELECT key, value, created_at, updated_at FROM {} WHERE namespace = $1 ORDER BY created_at DESC",
            KV_TABLE
        ))
        .bind(spec.name)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(decode_kv_row).collect()
    }

    async fn insert(&self, spec: &'static ResourceSpec, fields: Row) -> Result<Row, AppError> {
        if let Some(table) = spec.table() {
            return self
                .fetch_optional(spec, sql::insert(spec, table, &fields))
                .await?
                .ok_or(AppError::Db(sqlx::Error::RowNotFound));
        }
        let key = uuid::Uuid::new_v4().to_string();
        let row = sqlx::query(&format!(
            "INSERT INTO {} (namespace, key, value) VALUES ($1, $2, $3) RETURNING key, value, created_at, updated_at",
            KV_TABLE
        ))
        .bind(spec.name)
        .bind(&key)
        .bind(Value::Object(fields))
        .fetch_one(&self.pool)
        .await?;
        decode_kv_row(&row)
    }

    async fn update(&self, spec: &'static ResourceSpec, id: &RecordId, fields: Row) -> Result<Option<Row>, AppError> {
        if let Some(table) = spec.table() {
            let RecordId::Int(id) = id else {
                return Ok(None);
            };
            return self.fetch_optional(spec, sql::update(spec, table, *id, &fields)).await;
        }
        // `||` overwrites the given top-level keys and keeps the rest.
        let row = sqlx::query(&format!(
            "UPDATE {} SET value = value || $3, updated_at = NOW() \
             WHERE namespace = $1 AND key = $2 RETURNING key, value, created_at, updated_at",
            KV_TABLE
        ))
        .bind(spec.name)
        .bind(kv_key(id))
        .bind(Value::Object(fields))
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(decode_kv_row).transpose()
    }

    async fn delete(&self, spec: &'static ResourceSpec, id: &RecordId) -> Result<bool, AppError> {
        if let Some(table) = spec.table() {
            let RecordId::Int(id) = id else {
                return Ok(false);
            };
            let q = sql::delete(table, *id);
            tracing::debug!(sql = %q.sql, params = ?q.params, "query");
            let QueryBuf { sql, params } = q;
            let mut query = sqlx::query(&sql);
            for p in params {
                query = query.bind(p);
            }
            return Ok(query.fetch_optional(&self.pool).await?.is_some());
        }
        let result = sqlx::query(&format!("DELETE FROM {} WHERE namespace = $1 AND key = $2", KV_TABLE))
            .bind(spec.name)
            .bind(kv_key(id))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_document(&self, name: &str) -> Result<Option<Value>, AppError> {
        let row: Option<(Value,)> = sqlx::query_as(&format!(
            "SELECT value FROM {} WHERE namespace = $1 AND key = $2",
            KV_TABLE
        ))
        .bind(DOCUMENTS_NAMESPACE)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    async fn put_document(&self, name: &str, value: Value) -> Result<Value, AppError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (namespace, key, value, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (namespace, key)
            DO UPDATE SET value = $3, updated_at = NOW()
            "#,
            KV_TABLE
        ))
        .bind(DOCUMENTS_NAMESPACE)
        .bind(name)
        .bind(&value)
        .execute(&self.pool)
        .await?;
        Ok(value)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
