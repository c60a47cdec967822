//! Site entity - physical locations, optionally owned by a customer

use crate::schema::{EntitySchema, EntityType, FieldDescriptor, SelectOption};

const SITE_KINDS: &[SelectOption] = &[
    SelectOption::new("customer", "Customer premises"),
    SelectOption::new("service", "Service site"),
    SelectOption::new("auxiliary", "Auxiliary"),
];

const STATUSES: &[SelectOption] = &[
    SelectOption::new("planned", "Planned"),
    SelectOption::new("active", "Active"),
    SelectOption::new("inactive", "Inactive"),
];

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name", "Name").required(),
    FieldDescriptor::select("site_kind", "Site kind", SITE_KINDS),
    FieldDescriptor::text("address", "Address"),
    FieldDescriptor::float("latitude", "Latitude"),
    FieldDescriptor::float("longitude", "Longitude"),
    FieldDescriptor::select("status", "Status", STATUSES).with_default("active"),
    FieldDescriptor::reference("customer_id", "Customer", EntityType::Customers),
];

pub static SCHEMA: EntitySchema = EntitySchema {
    entity: EntityType::Sites,
    path: "sites",
    singular: "site",
    plural: "sites",
    label_field: Some("name"),
    active_status: "active",
    fields: FIELDS,
    columns: &["name", "site_kind", "address", "status", "customer_id"],
};
