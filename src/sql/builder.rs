//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for table-backed resources.

use super::params::PgBindValue;
use crate::model::ResourceSpec;
use crate::store::Row;

/// Quote identifier for PostgreSQL (safe: only from the model).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }
}

/// id, every field column, then the two timestamps.
pub fn select_column_list(spec: &ResourceSpec) -> String {
    std::iter::once("id")
        .chain(spec.fields.iter().map(|f| f.column))
        .chain(["created_at", "updated_at"])
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn select_list(spec: &ResourceSpec, table: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY \"created_at\" DESC, \"id\" DESC",
        select_column_list(spec),
        quoted(table)
    );
    q
}

/// INSERT of every field present in `row`; the database assigns id and timestamps.
pub fn insert(spec: &ResourceSpec, table: &str, row: &Row) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for f in spec.fields {
        if let Some(v) = row.get(f.column) {
            let n = q.push_param(PgBindValue::for_field(f.kind, v));
            cols.push(quoted(f.column));
            placeholders.push(format!("${}", n));
        }
    }
    q.sql = if cols.is_empty() {
        format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING {}",
            quoted(table),
            select_column_list(spec)
        )
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            quoted(table),
            cols.join(", "),
            placeholders.join(", "),
            select_column_list(spec)
        )
    };
    q
}

/// UPDATE of every field present in `row`, refreshing `updated_at`.
pub fn update(spec: &ResourceSpec, table: &str, id: i64, row: &Row) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for f in spec.fields {
        if let Some(v) = row.get(f.column) {
            let n = q.push_param(PgBindValue::for_field(f.kind, v));
            sets.push(format!("{} = ${}", quoted(f.column), n));
        }
    }
    sets.push("\"updated_at\" = NOW()".to_string());
    let id_param = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = ${} RETURNING {}",
        quoted(table),
        sets.join(", "),
        id_param,
        select_column_list(spec)
    );
    q
}

pub fn delete(table: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!("DELETE FROM {} WHERE \"id\" = ${} RETURNING \"id\"", quoted(table), n);
    q
}
