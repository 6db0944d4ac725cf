//! The boutique's resources.

use super::types::{Backing, FieldKind, FieldSpec, IdKind, ResourceSpec};

pub const ENQUIRY_STATUSES: &[&str] = &["pending", "contacted", "resolved", "closed"];

/// Key of the business profile document.
pub const BUSINESS_PROFILE: &str = "business_profile";

const CUSTOMER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::text("phone").required(),
    FieldSpec::optional_text("email").email(),
    FieldSpec::optional_text("address"),
];

const SUPPLIER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::text("phone").required(),
    FieldSpec::optional_text("email").email(),
    FieldSpec::optional_text("address"),
    FieldSpec::optional_text("contact_person"),
];

const CATALOGUE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::optional_text("description"),
    FieldSpec::new("items", FieldKind::IdList),
];

const ENQUIRY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::text("phone").required(),
    FieldSpec::optional_text("email").email(),
    FieldSpec::optional_text("message"),
    FieldSpec::new("status", FieldKind::Choice(ENQUIRY_STATUSES)),
    FieldSpec::optional_text("notes"),
];

// Staff only move an enquiry through its workflow.
const ENQUIRY_UPDATE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("status", FieldKind::Choice(ENQUIRY_STATUSES)).required(),
    FieldSpec::optional_text("notes"),
];

const INVENTORY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name").required(),
    FieldSpec::optional_text("description"),
    FieldSpec::optional_text("category"),
    FieldSpec::new("quantity", FieldKind::Integer),
    FieldSpec::new("price", FieldKind::Decimal),
    FieldSpec::new("images", FieldKind::TextList),
];

const SALE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("date", FieldKind::Date),
    FieldSpec::new("amount", FieldKind::Decimal),
    FieldSpec::new("items", FieldKind::JsonList),
    FieldSpec::optional_text("customer_name"),
    FieldSpec::optional_text("notes"),
];

pub static CUSTOMERS: ResourceSpec = ResourceSpec {
    name: "customers",
    path: "customers",
    label: "Customer",
    backing: Backing::Table("customers"),
    id_kind: IdKind::Integer,
    fields: CUSTOMER_FIELDS,
    update_fields: None,
};

pub static SUPPLIERS: ResourceSpec = ResourceSpec {
    name: "suppliers",
    path: "suppliers",
    label: "Supplier",
    backing: Backing::Table("suppliers"),
    id_kind: IdKind::Integer,
    fields: SUPPLIER_FIELDS,
    update_fields: None,
};

pub static CATALOGUES: ResourceSpec = ResourceSpec {
    name: "catalogues",
    path: "catalogues",
    label: "Catalogue",
    backing: Backing::Table("catalogues"),
    id_kind: IdKind::Integer,
    fields: CATALOGUE_FIELDS,
    update_fields: None,
};

pub static ENQUIRIES: ResourceSpec = ResourceSpec {
    name: "enquiries",
    path: "enquiries",
    label: "Enquiry",
    backing: Backing::Table("enquiries"),
    id_kind: IdKind::OpaqueInteger,
    fields: ENQUIRY_FIELDS,
    update_fields: Some(ENQUIRY_UPDATE_FIELDS),
};

pub static INVENTORY: ResourceSpec = ResourceSpec {
    name: "inventory",
    path: "inventory",
    label: "Inventory item",
    backing: Backing::Kv,
    id_kind: IdKind::Key,
    fields: INVENTORY_FIELDS,
    update_fields: None,
};

pub static SALES: ResourceSpec = ResourceSpec {
    name: "sales",
    path: "sales",
    label: "Sale",
    backing: Backing::Kv,
    id_kind: IdKind::Key,
    fields: SALE_FIELDS,
    update_fields: None,
};

pub static ALL_RESOURCES: &[&ResourceSpec] = &[
    &CUSTOMERS,
    &SUPPLIERS,
    &CATALOGUES,
    &ENQUIRIES,
    &INVENTORY,
    &SALES,
];

/// Resources served by the generic `/api/:resource` routes. Enquiries and sales have their own handlers.
static GENERIC_RESOURCES: &[&ResourceSpec] = &[&CUSTOMERS, &SUPPLIERS, &CATALOGUES, &INVENTORY];

pub fn resource_by_path(path: &str) -> Option<&'static ResourceSpec> {
    GENERIC_RESOURCES.iter().copied().find(|r| r.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_lookup_excludes_special_resources() {
        assert_eq!(resource_by_path("customers").map(|r| r.label), Some("Customer"));
        assert_eq!(resource_by_path("inventory").map(|r| r.name), Some("inventory"));
        assert!(resource_by_path("enquiries").is_none());
        assert!(resource_by_path("sales").is_none());
        assert!(resource_by_path("orders").is_none());
    }

    #[test]
    fn enquiry_updates_only_touch_status_and_notes() {
        let cols: Vec<&str> = ENQUIRIES.update_fields().iter().map(|f| f.column).collect();
        assert_eq!(cols, vec!["status", "notes"]);
        assert!(ENQUIRIES.update_fields()[0].required);
        assert_eq!(CUSTOMERS.update_fields().len(), CUSTOMERS.fields.len());
    }
}
