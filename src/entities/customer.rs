//! Customer entity - subscribers of the network

use crate::schema::{EntitySchema, EntityType, FieldDescriptor, SelectOption};

const CUSTOMER_KINDS: &[SelectOption] = &[
    SelectOption::new("individual", "Individual"),
    SelectOption::new("legal", "Legal entity"),
];

const STATUSES: &[SelectOption] = &[
    SelectOption::new("active", "Active"),
    SelectOption::new("inactive", "Inactive"),
];

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("tax_id", "Tax ID").required(),
    FieldDescriptor::text("name", "Name").required(),
    FieldDescriptor::text("address", "Address"),
    FieldDescriptor::select("customer_kind", "Customer kind", CUSTOMER_KINDS),
    FieldDescriptor::text("service_package", "Service package"),
    FieldDescriptor::select("status", "Status", STATUSES),
    FieldDescriptor::text("admin_contact", "Admin contact"),
    FieldDescriptor::text("technical_contact", "Technical contact"),
];

pub static SCHEMA: EntitySchema = EntitySchema {
    entity: EntityType::Customers,
    path: "customers",
    singular: "customer",
    plural: "customers",
    label_field: Some("name"),
    active_status: "active",
    fields: FIELDS,
    columns: &["tax_id", "name", "customer_kind", "service_package", "status"],
};
