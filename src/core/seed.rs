//! Demo data loader
//!
//! The embedded demo set refers to other records by 1-based position within
//! its own collection. Records are created in dependency order and each
//! reference is rewritten to the id the server assigned to that position.

use rust_embed::Embed;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::gateway::Gateway;
use crate::core::record::{Record, RecordId};
use crate::schema::EntityType;

#[derive(Embed)]
#[folder = "demo/"]
struct EmbeddedDemo;

const DEMO_FILE: &str = "demo_data.json";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("demo data file '{0}' is not embedded")]
    Missing(String),

    #[error("demo data is malformed: {0}")]
    Malformed(String),
}

/// Demo records grouped by entity type, in creation order
#[derive(Debug, Clone, Default)]
pub struct DemoSet {
    collections: Vec<(EntityType, Vec<Record>)>,
}

impl DemoSet {
    /// Load the demo set compiled into the binary
    pub fn embedded() -> Result<DemoSet, SeedError> {
        let file =
            EmbeddedDemo::get(DEMO_FILE).ok_or_else(|| SeedError::Missing(DEMO_FILE.to_string()))?;
        let text =
            std::str::from_utf8(&file.data).map_err(|e| SeedError::Malformed(e.to_string()))?;
        Self::from_json(text)
    }

    /// Parse a demo document: an object keyed by collection path
    pub fn from_json(text: &str) -> Result<DemoSet, SeedError> {
        let mut document: HashMap<String, Vec<Record>> =
            serde_json::from_str(text).map_err(|e| SeedError::Malformed(e.to_string()))?;

        for key in document.keys() {
            if !EntityType::all().iter().any(|e| e.path() == key) {
                return Err(SeedError::Malformed(format!("unknown collection '{}'", key)));
            }
        }

        let collections = EntityType::all()
            .iter()
            .filter_map(|&entity| document.remove(entity.path()).map(|r| (entity, r)))
            .collect();
        Ok(DemoSet { collections })
    }

    pub fn collections(&self) -> &[(EntityType, Vec<Record>)] {
        &self.collections
    }

    pub fn len(&self) -> usize {
        self.collections.iter().map(|(_, r)| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome for one entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedCount {
    pub entity: EntityType,
    pub created: usize,
    pub failed: usize,
}

/// Outcome of a seed run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub counts: Vec<SeedCount>,
    /// One line per rejected record
    pub failures: Vec<String>,
}

impl SeedReport {
    pub fn created(&self) -> usize {
        self.counts.iter().map(|c| c.created).sum()
    }

    pub fn failed(&self) -> usize {
        self.counts.iter().map(|c| c.failed).sum()
    }
}

/// Created ids per collection, indexed by 0-based position
type IdMap = HashMap<EntityType, Vec<Option<RecordId>>>;

/// Rewrite positional references to server ids
///
/// A position with no created record (out of range or failed) becomes null.
fn remap_references(entity: EntityType, record: &Record, ids: &IdMap) -> Record {
    let mut remapped = record.without_id();
    for (field, target) in entity.schema().references() {
        let Some(value) = record.get(field.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let resolved = value
            .as_u64()
            .and_then(|position| position.checked_sub(1))
            .and_then(|index| ids.get(&target)?.get(index as usize).copied().flatten());

        match resolved {
            Some(id) => remapped.set(field.name, Value::from(id.get())),
            None => {
                tracing::warn!(
                    %entity,
                    field = field.name,
                    %value,
                    "demo reference has no created target"
                );
                remapped.set(field.name, Value::Null);
            }
        }
    }
    remapped
}

/// Create every record of the demo set through the gateway
///
/// Individual failures are counted and reported; they never stop the run.
pub async fn seed<G: Gateway + ?Sized>(gateway: &G, demo: &DemoSet) -> SeedReport {
    let mut ids: IdMap = HashMap::new();
    let mut report = SeedReport::default();

    for (entity, records) in demo.collections() {
        let entity = *entity;
        let mut count = SeedCount {
            entity,
            created: 0,
            failed: 0,
        };
        ids.insert(entity, Vec::with_capacity(records.len()));

        for (index, record) in records.iter().enumerate() {
            let body = remap_references(entity, record, &ids);
            let created_id = match gateway.create(entity, &body).await {
                Ok(created) => {
                    tracing::info!(%entity, id = ?created.id(), "created demo record");
                    count.created += 1;
                    created.id()
                }
                Err(e) => {
                    tracing::warn!(%entity, position = index + 1, error = %e, "demo record rejected");
                    count.failed += 1;
                    report
                        .failures
                        .push(format!("{} #{}: {}", entity.singular(), index + 1, e));
                    None
                }
            };
            // Later records of the same collection may point back at this one
            ids.entry(entity).or_default().push(created_id);
        }

        report.counts.push(count);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MemoryGateway;
    use serde_json::json;

    #[test]
    fn test_embedded_demo_set_is_valid() {
        let demo = DemoSet::embedded().unwrap();
        let order: Vec<EntityType> = demo.collections().iter().map(|(e, _)| *e).collect();
        assert_eq!(order, EntityType::all());
        assert_eq!(demo.len(), 4 + 6 + 6 + 8);

        for (entity, records) in demo.collections() {
            let schema = entity.schema();
            for record in records {
                assert!(schema.missing_required(record).is_empty(), "{entity}: {record:?}");
                for key in record.values().keys() {
                    assert!(schema.field(key).is_some(), "{entity} has no field {key}");
                }
            }
        }
    }

    #[test]
    fn test_unknown_collection_is_rejected() {
        let err = DemoSet::from_json(r#"{ "routers": [] }"#).unwrap_err();
        assert!(matches!(err, SeedError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_seed_remaps_positions_to_created_ids() {
        let gateway = MemoryGateway::new();
        // Pre-existing rows shift the ids the server will hand out
        gateway.seed(EntityType::Sites, json!({ "name": "Old" }));

        let demo = DemoSet::from_json(
            r#"{
                "sites": [{ "name": "A" }, { "name": "B" }],
                "links": [
                    { "site_a_id": 1, "site_b_id": 2 },
                    { "site_a_id": 2, "site_b_id": 9, "redundant_link_id": 1 }
                ]
            }"#,
        )
        .unwrap();

        let report = seed(&gateway, &demo).await;
        assert_eq!(report.created(), 4);
        assert_eq!(report.failed(), 0);

        let links = gateway.records(EntityType::Links);
        assert_eq!(links[0].get("site_a_id"), Some(&json!(2)));
        assert_eq!(links[0].get("site_b_id"), Some(&json!(3)));
        assert_eq!(links[1].get("site_b_id"), Some(&Value::Null));
        assert_eq!(links[1].get("redundant_link_id"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_seed_counts_failures_and_continues() {
        let gateway = MemoryGateway::new();
        let demo = DemoSet::from_json(
            r#"{ "customers": [
                { "tax_id": "1", "name": "First" },
                { "tax_id": "2", "name": "Second" }
            ] }"#,
        )
        .unwrap();

        gateway.fail_next();
        let report = seed(&gateway, &demo).await;
        assert_eq!(report.created(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].starts_with("customer #1"));
        assert_eq!(gateway.records(EntityType::Customers).len(), 1);
    }
}
