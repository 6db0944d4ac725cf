//! Typed bind values: each field kind binds with its own PostgreSQL type.

use crate::model::FieldKind;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a PostgreSQL query.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    /// Typed NULL so the server can check it against the column.
    Null(PgTypeInfo),
    I64(i64),
    F64(f64),
    Text(String),
    Date(NaiveDate),
    I64Array(Vec<i64>),
    TextArray(Vec<String>),
    Json(Value),
}

fn type_of<T: Type<Postgres>>() -> PgTypeInfo {
    T::type_info()
}

impl PgBindValue {
    /// Convert an already-coerced column value according to its field kind.
    pub fn for_field(kind: FieldKind, v: &Value) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Choice(_) => match v {
                Value::String(s) => PgBindValue::Text(s.clone()),
                Value::Null => PgBindValue::Null(type_of::<String>()),
                other => PgBindValue::Text(other.to_string()),
            },
            FieldKind::Integer => v
                .as_i64()
                .map(PgBindValue::I64)
                .unwrap_or_else(|| PgBindValue::Null(type_of::<i64>())),
            FieldKind::Decimal => v
                .as_f64()
                .map(PgBindValue::F64)
                .unwrap_or_else(|| PgBindValue::Null(type_of::<f64>())),
            FieldKind::Date => v
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .map(PgBindValue::Date)
                .unwrap_or_else(|| PgBindValue::Null(type_of::<NaiveDate>())),
            FieldKind::IdList => PgBindValue::I64Array(
                v.as_array()
                    .map(|items| items.iter().filter_map(Value::as_i64).collect())
                    .unwrap_or_default(),
            ),
            FieldKind::TextList => PgBindValue::TextArray(
                v.as_array()
                    .map(|items| items.iter().filter_map(Value::as_str).map(String::from).collect())
                    .unwrap_or_default(),
            ),
            FieldKind::JsonList => PgBindValue::Json(v.clone()),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null(_) => IsNull::Yes,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            PgBindValue::Date(d) => <NaiveDate as Encode<Postgres>>::encode_by_ref(d, buf)?,
            PgBindValue::I64Array(v) => <Vec<i64> as Encode<Postgres>>::encode_by_ref(v, buf)?,
            PgBindValue::TextArray(v) => <Vec<String> as Encode<Postgres>>::encode_by_ref(v, buf)?,
            PgBindValue::Json(v) => <Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null(t) => t.clone(),
            PgBindValue::I64(_) => type_of::<i64>(),
            PgBindValue::F64(_) => type_of::<f64>(),
            PgBindValue::Text(_) => type_of::<String>(),
            PgBindValue::Date(_) => type_of::<NaiveDate>(),
            PgBindValue::I64Array(_) => type_of::<Vec<i64>>(),
            PgBindValue::TextArray(_) => type_of::<Vec<String>>(),
            PgBindValue::Json(_) => type_of::<Value>(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        type_of::<String>()
    }
}
