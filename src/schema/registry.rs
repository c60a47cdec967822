//! Schema registry - static description of every entity type
//!
//! The registry maps an entity-type tag to its [`EntitySchema`]. Dialogs,
//! tables and validation are driven entirely from these descriptors, so a new
//! entity type is added by declaring a schema in `crate::entities` and
//! registering it here.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field::FieldDescriptor;
use crate::core::record::Record;
use crate::entities;

/// Entity type tag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[value(alias = "customer")]
    Customers,
    #[value(alias = "site")]
    Sites,
    #[value(alias = "link")]
    Links,
    Equipment,
}

impl EntityType {
    /// All entity types, in dependency order (referenced types first)
    pub fn all() -> &'static [EntityType] {
        &[
            EntityType::Customers,
            EntityType::Sites,
            EntityType::Links,
            EntityType::Equipment,
        ]
    }

    /// Schema for this entity type
    pub fn schema(self) -> &'static EntitySchema {
        match self {
            EntityType::Customers => &entities::customer::SCHEMA,
            EntityType::Sites => &entities::site::SCHEMA,
            EntityType::Links => &entities::link::SCHEMA,
            EntityType::Equipment => &entities::equipment::SCHEMA,
        }
    }

    /// Resource path segment on the server (e.g. "customers")
    pub fn path(self) -> &'static str {
        self.schema().path
    }

    pub fn singular(self) -> &'static str {
        self.schema().singular
    }

    pub fn plural(self) -> &'static str {
        self.schema().plural
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::all()
            .iter()
            .copied()
            .find(|e| e.path() == s || e.singular() == s)
            .ok_or_else(|| format!("Unknown entity type: {}", s))
    }
}

/// Declarative description of one entity type
#[derive(Debug, Serialize)]
pub struct EntitySchema {
    pub entity: EntityType,
    /// Resource path segment, also the wire name of the collection
    pub path: &'static str,
    /// Singular name for messages (e.g. "customer")
    pub singular: &'static str,
    /// Plural name for messages (e.g. "customers")
    pub plural: &'static str,
    /// Field holding the record's display label, if any
    pub label_field: Option<&'static str>,
    /// Status value that marks a record as part of the active subset
    pub active_status: &'static str,
    /// Fields in declaration order
    pub fields: &'static [FieldDescriptor],
    /// Table columns shown after the id column
    pub columns: &'static [&'static str],
}

impl EntitySchema {
    /// Look up a field descriptor by wire name
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Reference fields and their target entity types
    pub fn references(&self) -> impl Iterator<Item = (&'static FieldDescriptor, EntityType)> {
        self.fields
            .iter()
            .filter_map(|f| f.reference_target().map(|t| (f, t)))
    }

    /// Names of required fields that are missing from `record`
    pub fn missing_required(&self, record: &Record) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required && f.is_missing(record.get(f.name)))
            .map(|f| f.name)
            .collect()
    }

    /// Whether the record belongs to the active subset used by statistics
    pub fn is_active(&self, record: &Record) -> bool {
        record.get("status").and_then(Value::as_str) == Some(self.active_status)
    }

    /// Restrict a record to exactly the declared field set
    ///
    /// Undeclared keys are dropped and declared keys that are absent become
    /// null. The id is kept as-is.
    pub fn project(&self, record: &Record) -> Record {
        let mut values = Map::new();
        for field in self.fields {
            let value = record.get(field.name).cloned().unwrap_or(Value::Null);
            values.insert(field.name.to_string(), value);
        }
        Record::from_parts(record.id(), values)
    }
}

/// Ordered field descriptors for an entity type
pub fn fields_for(entity: EntityType) -> &'static [FieldDescriptor] {
    entity.schema().fields
}

/// A fresh record seeded with every declared default
pub fn empty_record(entity: EntityType) -> Record {
    let values = fields_for(entity)
        .iter()
        .map(|f| (f.name.to_string(), f.default.to_value()))
        .collect();
    Record::from_parts(None, values)
}
