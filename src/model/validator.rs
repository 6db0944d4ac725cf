//! Model validation: catches definition mistakes at startup instead of at query time.

use crate::error::ConfigError;
use crate::model::{FieldKind, ResourceSpec, RESERVED_COLUMNS};
use std::collections::HashSet;

pub fn validate_model(resources: &[&ResourceSpec]) -> Result<(), ConfigError> {
    let mut paths = HashSet::new();
    for r in resources {
        if !paths.insert(r.path) {
            return Err(ConfigError::DuplicatePathSegment(r.path.to_string()));
        }
        let mut columns = HashSet::new();
        for f in r.fields {
            if RESERVED_COLUMNS.contains(&f.column) {
                return Err(ConfigError::ReservedColumn {
                    resource: r.name,
                    column: f.column,
                });
            }
            if !columns.insert(f.column) {
                return Err(ConfigError::DuplicateColumn {
                    resource: r.name,
                    column: f.column,
                });
            }
            if let FieldKind::Choice(values) = f.kind {
                if values.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "{}.{}: choice field needs at least one value",
                        r.name, f.column
                    )));
                }
            }
        }
        for f in r.update_fields() {
            match r.field(f.column) {
                Some(base) if base.kind == f.kind => {}
                _ => {
                    return Err(ConfigError::UnknownUpdateField {
                        resource: r.name,
                        column: f.column,
                    })
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Backing, FieldSpec, IdKind, ALL_RESOURCES};

    #[test]
    fn shipped_model_is_valid() {
        validate_model(ALL_RESOURCES).unwrap();
    }

    #[test]
    fn rejects_reserved_and_stray_update_columns() {
        static BAD_FIELDS: &[FieldSpec] = &[FieldSpec::text("created_at")];
        static BAD: ResourceSpec = ResourceSpec {
            name: "bad",
            path: "bad",
            label: "Bad",
            backing: Backing::Kv,
            id_kind: IdKind::Key,
            fields: BAD_FIELDS,
            update_fields: None,
        };
        assert!(matches!(
            validate_model(&[&BAD]),
            Err(ConfigError::ReservedColumn { column: "created_at", .. })
        ));

        static FIELDS: &[FieldSpec] = &[FieldSpec::text("name")];
        static UPDATE: &[FieldSpec] = &[FieldSpec::text("title")];
        static STRAY: ResourceSpec = ResourceSpec {
            name: "stray",
            path: "stray",
            label: "Stray",
            backing: Backing::Kv,
            id_kind: IdKind::Key,
            fields: FIELDS,
            update_fields: Some(UPDATE),
        };
        assert!(matches!(
            validate_model(&[&STRAY]),
            Err(ConfigError::UnknownUpdateField { column: "title", .. })
        ));
    }

    #[test]
    fn rejects_duplicate_paths() {
        static FIELDS: &[FieldSpec] = &[FieldSpec::text("name")];
        static ONE: ResourceSpec = ResourceSpec {
            name: "one",
            path: "things",
            label: "One",
            backing: Backing::Kv,
            id_kind: IdKind::Key,
            fields: FIELDS,
            update_fields: None,
        };
        static TWO: ResourceSpec = ResourceSpec {
            name: "two",
            path: "things",
            label: "Two",
            backing: Backing::Kv,
            id_kind: IdKind::Key,
            fields: FIELDS,
            update_fields: None,
        };
        assert!(matches!(
            validate_model(&[&ONE, &TWO]),
            Err(ConfigError::DuplicatePathSegment(p)) if p == "things"
        ));
    }
}
