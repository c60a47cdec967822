//! Record store - client-side cache of the last fetched collections
//!
//! The store is only ever written by swapping a whole collection after a
//! successful list response. There is no per-record mutation API.

use serde::Serialize;
use std::collections::HashMap;

use crate::core::record::{Record, RecordId};
use crate::schema::EntityType;

/// Last-fetched snapshot of every entity collection
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    collections: HashMap<EntityType, Vec<Record>>,
}

/// Counts for a single entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeStats {
    pub entity: EntityType,
    pub total: usize,
    pub active: usize,
}

/// Aggregate counts across all entity types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub types: Vec<TypeStats>,
}

impl Statistics {
    pub fn for_type(&self, entity: EntityType) -> Option<&TypeStats> {
        self.types.iter().find(|t| t.entity == entity)
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the collection for an entity type
    pub fn replace(&mut self, entity: EntityType, records: Vec<Record>) {
        self.collections.insert(entity, records);
    }

    /// Read-only view of the current collection (empty if never fetched)
    pub fn snapshot(&self, entity: EntityType) -> &[Record] {
        self.collections
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the entity type has been fetched at least once
    pub fn is_loaded(&self, entity: EntityType) -> bool {
        self.collections.contains_key(&entity)
    }

    pub fn get(&self, entity: EntityType, id: RecordId) -> Option<&Record> {
        self.snapshot(entity).iter().find(|r| r.id() == Some(id))
    }

    /// Total and active counts, recomputed from the current snapshots
    pub fn statistics(&self) -> Statistics {
        let types = EntityType::all()
            .iter()
            .map(|&entity| {
                let schema = entity.schema();
                let records = self.snapshot(entity);
                TypeStats {
                    entity,
                    total: records.len(),
                    active: records.iter().filter(|r| schema.is_active(r)).count(),
                }
            })
            .collect();

        Statistics { types }
    }
}
