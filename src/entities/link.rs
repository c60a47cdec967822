//! Link entity - physical or logical connection between two sites
//!
//! `redundant_link_id` points back into the links collection. It is a plain
//! id resolved on demand, never an embedded link.

use crate::schema::{EntitySchema, EntityType, FieldDescriptor, SelectOption};

const LINK_KINDS: &[SelectOption] = &[
    SelectOption::new("fiber", "Fiber"),
    SelectOption::new("copper", "Copper"),
    SelectOption::new("wireless", "Wireless"),
    SelectOption::new("P2P", "Point-to-point"),
    SelectOption::new("P2MP", "Point-to-multipoint"),
];

const STATUSES: &[SelectOption] = &[
    SelectOption::new("active", "Active"),
    SelectOption::new("planned", "Planned"),
    SelectOption::new("faulty", "Faulty"),
];

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::reference("site_a_id", "Site A", EntityType::Sites).required(),
    FieldDescriptor::reference("site_b_id", "Site B", EntityType::Sites).required(),
    FieldDescriptor::select("link_kind", "Link kind", LINK_KINDS),
    FieldDescriptor::integer("fiber_capacity", "Fiber strands"),
    FieldDescriptor::integer("pair_capacity", "Copper pairs"),
    FieldDescriptor::integer("speed_mbps", "Speed (Mbps)"),
    FieldDescriptor::select("status", "Status", STATUSES),
    FieldDescriptor::reference("redundant_link_id", "Redundant link", EntityType::Links),
];

pub static SCHEMA: EntitySchema = EntitySchema {
    entity: EntityType::Links,
    path: "links",
    singular: "link",
    plural: "links",
    label_field: None,
    active_status: "active",
    fields: FIELDS,
    columns: &["site_a_id", "site_b_id", "link_kind", "speed_mbps", "status"],
};
