//! Equipment entity - devices installed at a site

use crate::schema::{EntitySchema, EntityType, FieldDescriptor, SelectOption};

const EQUIPMENT_KINDS: &[SelectOption] = &[
    SelectOption::new("switch", "Switch"),
    SelectOption::new("router", "Router"),
    SelectOption::new("ONT", "ONT"),
    SelectOption::new("antenna", "Antenna"),
];

const STATUSES: &[SelectOption] = &[
    SelectOption::new("in_use", "In use"),
    SelectOption::new("spare", "Spare"),
    SelectOption::new("decommissioned", "Decommissioned"),
];

// serial_number is meant to be unique per device; the server decides.
const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::reference("site_id", "Site", EntityType::Sites).required(),
    FieldDescriptor::select("equipment_kind", "Equipment kind", EQUIPMENT_KINDS),
    FieldDescriptor::text("manufacturer", "Manufacturer"),
    FieldDescriptor::text("model", "Model"),
    FieldDescriptor::text("serial_number", "Serial number").required(),
    FieldDescriptor::text("inventory_tag", "Inventory tag"),
    FieldDescriptor::select("status", "Status", STATUSES),
    FieldDescriptor::date("installed_on", "Installed on"),
];

pub static SCHEMA: EntitySchema = EntitySchema {
    entity: EntityType::Equipment,
    path: "equipment",
    singular: "equipment",
    plural: "equipment",
    label_field: Some("serial_number"),
    active_status: "in_use",
    fields: FIELDS,
    columns: &[
        "site_id",
        "equipment_kind",
        "manufacturer",
        "model",
        "serial_number",
        "status",
    ],
};
