//! Resource model: one field schema per resource drives validation, SQL and the wire shape.

use crate::case::to_camel_case;

/// Columns managed by the store; never part of a field schema.
pub const RESERVED_COLUMNS: &[&str] = &["id", "created_at", "updated_at"];

/// How a field is coerced between request body, persisted row and response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    /// Calendar date as `YYYY-MM-DD`.
    Date,
    /// One of a fixed set of values; the first one is the default.
    Choice(&'static [&'static str]),
    /// Integer ids of other records. Stored as integers, exposed as strings.
    IdList,
    TextList,
    JsonList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Email,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// snake_case column name; the wire name is its camelCase form.
    pub column: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Text only: empty or absent input persists as NULL.
    pub nullable: bool,
    pub format: Option<TextFormat>,
}

impl FieldSpec {
    pub const fn new(column: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            column,
            kind,
            required: false,
            nullable: false,
            format: None,
        }
    }

    pub const fn text(column: &'static str) -> Self {
        Self::new(column, FieldKind::Text)
    }

    pub const fn optional_text(column: &'static str) -> Self {
        FieldSpec {
            nullable: true,
            ..Self::new(column, FieldKind::Text)
        }
    }

    pub const fn required(self) -> Self {
        FieldSpec {
            required: true,
            ..self
        }
    }

    pub const fn email(self) -> Self {
        FieldSpec {
            format: Some(TextFormat::Email),
            ..self
        }
    }

    pub fn wire_name(&self) -> String {
        to_camel_case(self.column)
    }
}

/// How path identifiers are parsed for a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    /// Generated integer. Malformed path ids are a bad request.
    Integer,
    /// Generated integer addressed as an opaque string: malformed ids match nothing.
    OpaqueInteger,
    /// Generated UUID string.
    Key,
}

/// Where records of a resource live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backing {
    /// One relational table, one row per record.
    Table(&'static str),
    /// JSON records in the key/value table, namespaced by resource name.
    Kv,
}

#[derive(Debug)]
pub struct ResourceSpec {
    /// Stable name; also the key/value namespace.
    pub name: &'static str,
    /// URL path segment under `/api`.
    pub path: &'static str,
    /// Human label used in messages ("Customer not found").
    pub label: &'static str,
    pub backing: Backing,
    pub id_kind: IdKind,
    pub fields: &'static [FieldSpec],
    /// Restricted field set for updates; `None` means the update replaces all fields.
    pub update_fields: Option<&'static [FieldSpec]>,
}

impl ResourceSpec {
    pub fn update_fields(&self) -> &'static [FieldSpec] {
        self.update_fields.unwrap_or(self.fields)
    }

    pub fn field(&self, column: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.column == column)
    }

    pub fn table(&self) -> Option<&'static str> {
        match self.backing {
            Backing::Table(t) => Some(t),
            Backing::Kv => None,
        }
    }
}
