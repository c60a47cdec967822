//! Schema module - entity schema registry and field descriptors

pub mod field;
pub mod registry;

pub use field::{display_value, DefaultValue, FieldDescriptor, FieldError, FieldKind, SelectOption};
pub use registry::{empty_record, fields_for, EntitySchema, EntityType};
