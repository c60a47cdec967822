//! Reference resolver - turns foreign-key ids into display labels
//!
//! A dangling reference is not an error: the raw id is rendered instead.

use serde_json::Value;

use crate::core::record::{Record, RecordId};
use crate::core::store::RecordStore;
use crate::schema::field::{display_value, FieldDescriptor};
use crate::schema::EntityType;

/// Read-only view over the live store
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a RecordStore,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Display label for `id`, or the id itself when it cannot be resolved
    pub fn label(&self, entity: EntityType, id: RecordId) -> String {
        match self.store.get(entity, id) {
            Some(record) => record_label(entity, record),
            None => {
                tracing::trace!(%entity, %id, "reference not in snapshot");
                id.to_string()
            }
        }
    }

    /// Selectable targets for a reference field, in store order
    pub fn candidates(&self, entity: EntityType) -> Vec<(RecordId, String)> {
        self.store
            .snapshot(entity)
            .iter()
            .filter_map(|r| r.id().map(|id| (id, record_label(entity, r))))
            .collect()
    }

    /// Render a field value for display, resolving references
    pub fn display(&self, field: &FieldDescriptor, value: Option<&Value>) -> String {
        match (field.reference_target(), value) {
            (Some(target), Some(v)) => match RecordId::from_value(v) {
                Some(id) => self.label(target, id),
                None => display_value(value),
            },
            _ => display_value(value),
        }
    }
}

/// Label of a record that is known to exist
fn record_label(entity: EntityType, record: &Record) -> String {
    let schema = entity.schema();
    let id = record.id().map(|id| id.to_string()).unwrap_or_default();

    match schema.label_field.and_then(|f| record.get(f)) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(v) if !v.is_null() && !v.is_string() => v.to_string(),
        _ if schema.label_field.is_some() => id,
        _ => format!("{} #{}", schema.singular, id),
    }
}
