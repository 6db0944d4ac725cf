//! Process-local store. One lock serializes writers, so concurrent requests cannot interleave a write.

use super::{RecordId, RecordStore, Row};
use crate::error::AppError;
use crate::model::{IdKind, ResourceSpec};
use crate::service::normalize::format_timestamp;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    /// Insertion order per resource.
    records: HashMap<&'static str, Vec<Row>>,
    next_id: HashMap<&'static str, i64>,
    documents: HashMap<String, Value>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_matches(row: &Row, id: &RecordId) -> bool {
    match (row.get("id"), id) {
        (Some(Value::Number(n)), RecordId::Int(i)) => n.as_i64() == Some(*i),
        (Some(Value::String(s)), RecordId::Key(k)) => s == k,
        _ => false,
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, spec: &'static ResourceSpec) -> Result<Vec<Row>, AppError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Row> = inner
            .records
            .get(spec.name)
            .map(|v| v.iter().rev().cloned().collect())
            .unwrap_or_default();
        // Stable sort keeps later inserts first among equal timestamps.
        rows.sort_by(|a, b| {
            let a = a.get("created_at").and_then(Value::as_str).unwrap_or("");
            let b = b.get("created_at").and_then(Value::as_str).unwrap_or("");
            b.cmp(a)
        });
        Ok(rows)
    }

    async fn insert(&self, spec: &'static ResourceSpec, mut fields: Row) -> Result<Row, AppError> {
        let mut inner = self.inner.write().await;
        let id = match spec.id_kind {
            IdKind::Integer | IdKind::OpaqueInteger => {
                let next = inner.next_id.entry(spec.name).or_insert(0);
                *next += 1;
                Value::Number((*next).into())
            }
            IdKind::Key => Value::String(uuid::Uuid::new_v4().to_string()),
        };
        let now = Value::String(format_timestamp(Utc::now()));
        fields.insert("id".into(), id);
        fields.insert("created_at".into(), now.clone());
        fields.insert("updated_at".into(), now);
        inner.records.entry(spec.name).or_default().push(fields.clone());
        Ok(fields)
    }

    async fn update(&self, spec: &'static ResourceSpec, id: &RecordId, fields: Row) -> Result<Option<Row>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner
            .records
            .get_mut(spec.name)
            .and_then(|rows| rows.iter_mut().find(|r| id_matches(r, id)))
        else {
            return Ok(None);
        };
        for (column, value) in fields {
            row.insert(column, value);
        }
        row.insert("updated_at".into(), Value::String(format_timestamp(Utc::now())));
        Ok(Some(row.clone()))
    }

    async fn delete(&self, spec: &'static ResourceSpec, id: &RecordId) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let Some(rows) = inner.records.get_mut(spec.name) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| !id_matches(r, id));
        Ok(rows.len() != before)
    }

    async fn get_document(&self, name: &str) -> Result<Option<Value>, AppError> {
        Ok(self.inner.read().await.documents.get(name).cloned())
    }

    async fn put_document(&self, name: &str, value: Value) -> Result<Value, AppError> {
        self.inner
            .write()
            .await
            .documents
            .insert(name.to_string(), value.clone());
        Ok(value)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
