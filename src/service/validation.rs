//! Request validation from the resource field schema.

use crate::error::AppError;
use crate::model::{FieldKind, FieldSpec, TextFormat};
use regex::Regex;
use serde_json::{Map, Value};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

pub struct RequestValidator;

impl RequestValidator {
    /// Body must be a JSON object carrying every required field; present values must fit their format.
    pub fn validate<'a>(body: &'a Value, fields: &[FieldSpec]) -> Result<&'a Map<String, Value>, AppError> {
        let body = body
            .as_object()
            .ok_or_else(|| AppError::BadRequest("body must be a JSON object".into()))?;
        for f in fields {
            let key = f.wire_name();
            let val = body.get(&key);
            if f.required && is_blank(val) {
                return Err(AppError::Validation(format!("{} is required", key)));
            }
            if let Some(v) = val {
                validate_field(&key, v, f)?;
            }
        }
        Ok(body)
    }
}

fn is_blank(val: Option<&Value>) -> bool {
    match val {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn validate_field(key: &str, v: &Value, f: &FieldSpec) -> Result<(), AppError> {
    let Some(s) = v.as_str().filter(|s| !s.is_empty()) else {
        return Ok(());
    };
    if let Some(TextFormat::Email) = f.format {
        let re = Regex::new(EMAIL_PATTERN).map_err(|e| AppError::Internal(format!("email pattern: {}", e)))?;
        if !re.is_match(s) {
            return Err(AppError::Validation(format!("{} must be a valid email", key)));
        }
    }
    if let FieldKind::Choice(allowed) = f.kind {
        if !allowed.contains(&s) {
            return Err(AppError::Validation(format!(
                "{} must be one of: {}",
                key,
                allowed.join(", ")
            )));
        }
    }
    Ok(())
}
