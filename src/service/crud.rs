//! Generic CRUD: validate, coerce, persist, normalize.

use super::normalize::{not_found, parse_id, to_row, to_wire};
use super::sales::SalesFilter;
use super::validation::RequestValidator;
use crate::error::AppError;
use crate::model::{ResourceSpec, BUSINESS_PROFILE, SALES};
use crate::store::RecordStore;
use serde_json::{json, Value};

pub struct CrudService;

impl CrudService {
    /// All records, newest first.
    pub async fn list(store: &dyn RecordStore, spec: &'static ResourceSpec) -> Result<Vec<Value>, AppError> {
        let rows = store.list(spec).await?;
        Ok(rows.iter().map(|r| to_wire(spec, r)).collect())
    }

    pub async fn create(store: &dyn RecordStore, spec: &'static ResourceSpec, body: &Value) -> Result<Value, AppError> {
        let body = RequestValidator::validate(body, spec.fields)?;
        let fields = to_row(spec.fields, body)?;
        let row = store.insert(spec, fields).await?;
        let id = row.get("id").cloned().unwrap_or_default();
        tracing::info!(resource = spec.name, %id, "created");
        Ok(to_wire(spec, &row))
    }

    /// Replaces every updatable field; absent optional fields are cleared.
    pub async fn update(
        store: &dyn RecordStore,
        spec: &'static ResourceSpec,
        raw_id: &str,
        body: &Value,
    ) -> Result<Value, AppError> {
        let fields = spec.update_fields();
        let body = RequestValidator::validate(body, fields)?;
        let id = parse_id(spec, raw_id)?;
        let values = to_row(fields, body)?;
        let row = store
            .update(spec, &id, values)
            .await?
            .ok_or_else(|| not_found(spec))?;
        tracing::info!(resource = spec.name, %id, "updated");
        Ok(to_wire(spec, &row))
    }

    pub async fn delete(store: &dyn RecordStore, spec: &'static ResourceSpec, raw_id: &str) -> Result<(), AppError> {
        let id = parse_id(spec, raw_id)?;
        if !store.delete(spec, &id).await? {
            return Err(not_found(spec));
        }
        tracing::info!(resource = spec.name, %id, "deleted");
        Ok(())
    }

    /// Sales matching the filter, most recent sale date first.
    pub async fn list_sales(store: &dyn RecordStore, filter: &SalesFilter) -> Result<Vec<Value>, AppError> {
        let mut rows: Vec<_> = store
            .list(&SALES)
            .await?
            .into_iter()
            .filter(|r| filter.matches(r.get("date").and_then(Value::as_str).unwrap_or("")))
            .collect();
        // Stable: same-day sales stay newest-created first.
        rows.sort_by(|a, b| {
            let a = a.get("date").and_then(Value::as_str).unwrap_or("");
            let b = b.get("date").and_then(Value::as_str).unwrap_or("");
            b.cmp(a)
        });
        Ok(rows.iter().map(|r| to_wire(&SALES, r)).collect())
    }

    /// The stored business profile, or an empty object before the first save.
    pub async fn profile(store: &dyn RecordStore) -> Result<Value, AppError> {
        Ok(store.get_document(BUSINESS_PROFILE).await?.unwrap_or_else(|| json!({})))
    }

    pub async fn replace_profile(store: &dyn RecordStore, body: Value) -> Result<Value, AppError> {
        if !body.is_object() {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        }
        let saved = store.put_document(BUSINESS_PROFILE, body).await?;
        tracing::info!("business profile replaced");
        Ok(saved)
    }
}
