//! Persistence accessor. Handlers see one `RecordStore`; Postgres in production, memory in tests and demos.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgStore, KV_TABLE};

use crate::error::AppError;
use crate::model::ResourceSpec;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// A persisted record keyed by snake_case column: the schema fields plus `id`, `created_at`, `updated_at`.
pub type Row = Map<String, Value>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordId {
    Int(i64),
    Key(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Key(k) => f.write_str(k),
        }
    }
}

/// Each method is one logical persistence operation.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, newest first by creation time.
    async fn list(&self, spec: &'static ResourceSpec) -> Result<Vec<Row>, AppError>;

    /// Insert `fields` (column values for `spec.fields`); assigns id and timestamps.
    async fn insert(&self, spec: &'static ResourceSpec, fields: Row) -> Result<Row, AppError>;

    /// Overwrite `fields` and refresh `updated_at`. `None` when no record has this id.
    async fn update(&self, spec: &'static ResourceSpec, id: &RecordId, fields: Row) -> Result<Option<Row>, AppError>;

    /// `false` when no record has this id.
    async fn delete(&self, spec: &'static ResourceSpec, id: &RecordId) -> Result<bool, AppError>;

    /// Singleton JSON document by name.
    async fn get_document(&self, name: &str) -> Result<Option<Value>, AppError>;

    async fn put_document(&self, name: &str, value: Value) -> Result<Value, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
