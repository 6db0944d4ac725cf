//! Mapping between request bodies, persisted rows and the wire shape, driven by the field schema.

use crate::case::to_camel_case;
use crate::error::AppError;
use crate::model::{FieldKind, FieldSpec, IdKind, ResourceSpec};
use crate::store::{RecordId, Row};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

const TIMESTAMP_COLUMNS: &[&str] = &["created_at", "updated_at"];

/// RFC 3339 with millisecond precision and a `Z` suffix, e.g. `2024-03-05T09:30:00.000Z`.
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Strict base-10 parse: ASCII digits only, no sign, no whitespace.
pub fn parse_integer(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

pub fn not_found(spec: &ResourceSpec) -> AppError {
    AppError::NotFound(format!("{} not found", spec.label))
}

pub fn parse_id(spec: &ResourceSpec, raw: &str) -> Result<RecordId, AppError> {
    match spec.id_kind {
        IdKind::Integer => parse_integer(raw)
            .map(RecordId::Int)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid {} ID", spec.label.to_lowercase()))),
        IdKind::OpaqueInteger => parse_integer(raw).map(RecordId::Int).ok_or_else(|| not_found(spec)),
        IdKind::Key => Ok(RecordId::Key(raw.to_string())),
    }
}

/// Request body (camelCase keys) to a row of column values for `fields`.
/// Absent fields take their defaults: a full replacement, not a patch.
pub fn to_row(fields: &[FieldSpec], body: &Map<String, Value>) -> Result<Row, AppError> {
    let mut row = Row::new();
    for f in fields {
        let value = body.get(&f.wire_name()).filter(|v| !v.is_null());
        row.insert(f.column.to_string(), coerce(f, value)?);
    }
    Ok(row)
}

fn invalid(f: &FieldSpec, what: &str) -> AppError {
    AppError::Validation(format!("{} {}", f.wire_name(), what))
}

fn coerce(f: &FieldSpec, value: Option<&Value>) -> Result<Value, AppError> {
    Ok(match f.kind {
        FieldKind::Text => {
            let text = match value {
                None => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Bool(b)) => Some(b.to_string()),
                Some(_) => return Err(invalid(f, "must be text")),
            };
            match text.filter(|s| !s.trim().is_empty()) {
                Some(s) => Value::String(s),
                None if f.nullable => Value::Null,
                None => Value::String(String::new()),
            }
        }
        FieldKind::Integer => match value {
            None => Value::Number(0.into()),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Value::Number(i.into()),
                None => return Err(invalid(f, "must be a whole number")),
            },
            Some(Value::String(s)) if s.trim().is_empty() => Value::Number(0.into()),
            Some(Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Value::Number(i.into()),
                Err(_) => return Err(invalid(f, "must be a whole number")),
            },
            Some(_) => return Err(invalid(f, "must be a whole number")),
        },
        FieldKind::Decimal => match value {
            None => Value::Number(0.into()),
            Some(Value::Number(n)) => Value::Number(n.clone()),
            Some(Value::String(s)) if s.trim().is_empty() => Value::Number(0.into()),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| invalid(f, "must be a number"))?,
            Some(_) => return Err(invalid(f, "must be a number")),
        },
        FieldKind::Date => match value {
            None => Value::String(Utc::now().date_naive().format("%Y-%m-%d").to_string()),
            Some(Value::String(s)) if s.is_empty() => {
                Value::String(Utc::now().date_naive().format("%Y-%m-%d").to_string())
            }
            Some(Value::String(s)) => Value::String(parse_date(s).ok_or_else(|| invalid(f, "must be a date (YYYY-MM-DD)"))?),
            Some(_) => return Err(invalid(f, "must be a date (YYYY-MM-DD)")),
        },
        FieldKind::Choice(values) => match value {
            None => Value::String(values[0].to_string()),
            Some(Value::String(s)) if s.is_empty() => Value::String(values[0].to_string()),
            Some(Value::String(s)) if values.contains(&s.as_str()) => Value::String(s.clone()),
            Some(_) => return Err(invalid(f, &format!("must be one of: {}", values.join(", ")))),
        },
        FieldKind::IdList => match value {
            None => Value::Array(Vec::new()),
            // Entries that are not integer ids are dropped, not rejected.
            Some(Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => parse_integer(s),
                        Value::Number(n) => n.as_i64().filter(|i| *i >= 0),
                        _ => None,
                    })
                    .map(|i| Value::Number(i.into()))
                    .collect(),
            ),
            Some(_) => return Err(invalid(f, "must be a list")),
        },
        FieldKind::TextList => match value {
            None => Value::Array(Vec::new()),
            Some(Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()))
                    .collect(),
            ),
            Some(_) => return Err(invalid(f, "must be a list")),
        },
        FieldKind::JsonList => match value {
            None => Value::Array(Vec::new()),
            Some(Value::Array(items)) => Value::Array(items.clone()),
            Some(_) => return Err(invalid(f, "must be a list")),
        },
    })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp; keeps the calendar date.
fn parse_date(s: &str) -> Option<String> {
    if s.len() == 10 {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%Y-%m-%d").to_string());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc).date_naive().format("%Y-%m-%d").to_string())
}

/// Persisted row to the API shape: string ids, camelCase keys, defaults for nulls.
pub fn to_wire(spec: &ResourceSpec, row: &Row) -> Value {
    let mut out = Map::new();
    let id = match row.get("id") {
        Some(Value::Number(n)) => Value::String(n.to_string()),
        Some(Value::String(s)) => Value::String(s.clone()),
        _ => Value::String(String::new()),
    };
    out.insert("id".into(), id);
    for f in spec.fields {
        out.insert(f.wire_name(), field_to_wire(f, row.get(f.column)));
    }
    for col in TIMESTAMP_COLUMNS {
        let v = row
            .get(*col)
            .filter(|v| v.is_string())
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
        out.insert(to_camel_case(col), v);
    }
    Value::Object(out)
}

fn field_to_wire(f: &FieldSpec, value: Option<&Value>) -> Value {
    let value = value.filter(|v| !v.is_null());
    match f.kind {
        FieldKind::Text | FieldKind::Date => match value {
            Some(Value::String(s)) => Value::String(s.clone()),
            Some(other) => Value::String(other.to_string()),
            None => Value::String(String::new()),
        },
        FieldKind::Integer | FieldKind::Decimal => match value {
            Some(Value::Number(n)) => Value::Number(n.clone()),
            Some(Value::String(s)) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::Number(0.into())),
            _ => Value::Number(0.into()),
        },
        FieldKind::Choice(values) => match value {
            Some(Value::String(s)) => Value::String(s.clone()),
            _ => Value::String(values[0].to_string()),
        },
        FieldKind::IdList => match value {
            Some(Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .filter_map(|i| match i {
                        Value::Number(n) => Some(Value::String(n.to_string())),
                        Value::String(s) => Some(Value::String(s.clone())),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => Value::Array(Vec::new()),
        },
        FieldKind::TextList | FieldKind::JsonList => match value {
            Some(Value::Array(items)) => Value::Array(items.clone()),
            _ => Value::Array(Vec::new()),
        },
    }
}
