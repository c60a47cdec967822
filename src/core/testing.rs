//! In-memory gateway for unit tests

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::core::gateway::{Gateway, GatewayError, ServerStats};
use crate::core::record::{Record, RecordId};
use crate::schema::EntityType;

#[derive(Default)]
struct Inner {
    tables: HashMap<EntityType, Vec<Record>>,
    next_id: HashMap<EntityType, i64>,
    calls: Vec<String>,
    fail_next: bool,
}

/// Gateway backed by a map, recording every call as `"METHOD /path"`
#[derive(Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the call log
    pub fn seed(&self, entity: EntityType, value: Value) -> RecordId {
        let record: Record = serde_json::from_value(value).unwrap();
        let mut inner = self.inner.lock().unwrap();
        insert(&mut inner, entity, &record)
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Make the next call fail with a 500
    pub fn fail_next(&self) {
        self.inner.lock().unwrap().fail_next = true;
    }

    pub fn records(&self, entity: EntityType) -> Vec<Record> {
        self.inner
            .lock()
            .unwrap()
            .tables
            .get(&entity)
            .cloned()
            .unwrap_or_default()
    }

    fn begin(&self, method: Method, path: String) -> Result<MutexGuard<'_, Inner>, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("{} {}", method, path));
        if std::mem::take(&mut inner.fail_next) {
            return Err(GatewayError::Status {
                method,
                url: path,
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(inner)
    }
}

fn insert(inner: &mut Inner, entity: EntityType, record: &Record) -> RecordId {
    let next = inner.next_id.entry(entity).or_insert(0);
    *next += 1;
    let id = RecordId::new(*next);
    let stored = Record::from_parts(Some(id), entity.schema().project(record).values().clone());
    inner.tables.entry(entity).or_default().push(stored);
    id
}

fn not_found(method: Method, path: String) -> GatewayError {
    GatewayError::Status {
        method,
        url: path,
        status: StatusCode::NOT_FOUND,
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn list(&self, entity: EntityType) -> Result<Vec<Record>, GatewayError> {
        let inner = self.begin(Method::GET, format!("/{}", entity.path()))?;
        Ok(inner.tables.get(&entity).cloned().unwrap_or_default())
    }

    async fn create(&self, entity: EntityType, record: &Record) -> Result<Record, GatewayError> {
        let mut inner = self.begin(Method::POST, format!("/{}", entity.path()))?;
        let id = insert(&mut inner, entity, record);
        let created = inner.tables[&entity]
            .iter()
            .find(|r| r.id() == Some(id))
            .cloned()
            .unwrap();
        Ok(created)
    }

    async fn update(
        &self,
        entity: EntityType,
        id: RecordId,
        record: &Record,
    ) -> Result<Record, GatewayError> {
        let path = format!("/{}/{}", entity.path(), id);
        let mut inner = self.begin(Method::PUT, path.clone())?;
        let table = inner.tables.entry(entity).or_default();
        let slot = table
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| not_found(Method::PUT, path))?;
        *slot = Record::from_parts(Some(id), entity.schema().project(record).values().clone());
        Ok(slot.clone())
    }

    async fn delete(&self, entity: EntityType, id: RecordId) -> Result<(), GatewayError> {
        let path = format!("/{}/{}", entity.path(), id);
        let mut inner = self.begin(Method::DELETE, path.clone())?;
        let table = inner.tables.entry(entity).or_default();
        let before = table.len();
        table.retain(|r| r.id() != Some(id));
        if table.len() == before {
            return Err(not_found(Method::DELETE, path));
        }
        Ok(())
    }

    async fn stats(&self) -> Result<ServerStats, GatewayError> {
        let inner = self.begin(Method::GET, "/stats".to_string())?;
        let mut stats = ServerStats::new();
        for &entity in EntityType::all() {
            let records = inner.tables.get(&entity).map(Vec::as_slice).unwrap_or(&[]);
            let active = records
                .iter()
                .filter(|r| entity.schema().is_active(r))
                .count();
            stats.insert(entity.path().to_string(), Value::from(records.len()));
            stats.insert(format!("active_{}", entity.path()), Value::from(active));
        }
        Ok(stats)
    }
}
