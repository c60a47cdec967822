//! Shared test helpers for integration tests
//!
//! `FakeBackend` is an in-memory REST server with the same routes as the
//! real backend. It runs on its own thread so both async tests and
//! `assert_cmd` tests can use it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use assert_cmd::cargo;
use assert_cmd::Command;
use axum::extract::{Path, Request, State};
use axum::http::{Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use ems::core::Record;
use ems::schema::EntityType;

/// Helper to get an ems command isolated from the user's config
pub fn ems() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("ems"));
    cmd.env("EMS_CONFIG", "/nonexistent/ems-test-config.yaml")
        .env_remove("EMS_API_URL")
        .env_remove("EMS_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

#[derive(Default)]
struct BackendState {
    tables: HashMap<EntityType, Vec<Value>>,
    next_id: HashMap<EntityType, i64>,
    /// Every request as "METHOD /path", in arrival order
    log: Vec<String>,
    /// Reject every POST/PUT with 422
    reject_writes: bool,
    /// Fail every request with 500
    broken: bool,
}

type Shared = Arc<Mutex<BackendState>>;

pub struct FakeBackend {
    pub url: String,
    state: Shared,
}

impl FakeBackend {
    pub fn start() -> FakeBackend {
        let state: Shared = Arc::default();
        let app = router(state.clone());

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        let addr = rx.recv().unwrap();
        FakeBackend {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Insert a record without logging a request; returns its id
    pub fn insert(&self, entity: EntityType, value: Value) -> i64 {
        let mut state = self.state.lock().unwrap();
        store(&mut state, entity, value)
    }

    pub fn records(&self, entity: EntityType) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state.tables.get(&entity).cloned().unwrap_or_default()
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.lock().unwrap().log.clear();
    }

    pub fn reject_writes(&self, reject: bool) {
        self.state.lock().unwrap().reject_writes = reject;
    }

    pub fn set_broken(&self, broken: bool) {
        self.state.lock().unwrap().broken = broken;
    }
}

fn store(state: &mut BackendState, entity: EntityType, mut value: Value) -> i64 {
    let next = state.next_id.entry(entity).or_insert(0);
    *next += 1;
    let id = *next;
    if let Some(map) = value.as_object_mut() {
        map.insert("id".into(), json!(id));
        map.insert("created_at".into(), json!("2024-01-01T00:00:00"));
    }
    state.tables.entry(entity).or_default().push(value);
    id
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/stats", get(stats))
        .route("/:collection", get(list).post(create))
        .route("/:collection/:id", put(update).delete(remove))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    request: Request,
    next: Next,
) -> Response {
    let broken = {
        let mut state = state.lock().unwrap();
        state.log.push(format!("{} {}", method, uri.path()));
        state.broken
    };
    if broken {
        return (StatusCode::INTERNAL_SERVER_ERROR, "backend down").into_response();
    }
    next.run(request).await
}

fn entity(collection: &str) -> Result<EntityType, Response> {
    EntityType::all()
        .iter()
        .copied()
        .find(|e| e.path() == collection)
        .ok_or_else(|| StatusCode::NOT_FOUND.into_response())
}

fn check_body(entity: EntityType, body: &Value, reject: bool) -> Result<(), Response> {
    if reject {
        return Err(unprocessable("writes are disabled"));
    }
    let record: Record =
        serde_json::from_value(body.clone()).map_err(|e| unprocessable(&e.to_string()))?;
    let missing = entity.schema().missing_required(&record);
    if !missing.is_empty() {
        return Err(unprocessable(&format!("missing: {}", missing.join(", "))));
    }
    Ok(())
}

fn unprocessable(detail: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": detail })),
    )
        .into_response()
}

async fn list(State(state): State<Shared>, Path(collection): Path<String>) -> Response {
    let entity = match entity(&collection) {
        Ok(e) => e,
        Err(r) => return r,
    };
    let state = state.lock().unwrap();
    Json(state.tables.get(&entity).cloned().unwrap_or_default()).into_response()
}

async fn create(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let entity = match entity(&collection) {
        Ok(e) => e,
        Err(r) => return r,
    };
    let mut state = state.lock().unwrap();
    if let Err(r) = check_body(entity, &body, state.reject_writes) {
        return r;
    }
    let id = store(&mut state, entity, body);
    let created = state.tables[&entity]
        .iter()
        .find(|r| r["id"] == json!(id))
        .cloned()
        .unwrap_or(Value::Null);
    Json(created).into_response()
}

async fn update(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, i64)>,
    Json(mut body): Json<Value>,
) -> Response {
    let entity = match entity(&collection) {
        Ok(e) => e,
        Err(r) => return r,
    };
    let mut state = state.lock().unwrap();
    if let Err(r) = check_body(entity, &body, state.reject_writes) {
        return r;
    }
    let table = state.tables.entry(entity).or_default();
    let Some(slot) = table.iter_mut().find(|r| r["id"] == json!(id)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(map) = body.as_object_mut() {
        map.insert("id".into(), json!(id));
        map.insert("created_at".into(), slot["created_at"].clone());
    }
    *slot = body.clone();
    Json(body).into_response()
}

async fn remove(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, i64)>,
) -> Response {
    let entity = match entity(&collection) {
        Ok(e) => e,
        Err(r) => return r,
    };
    let mut state = state.lock().unwrap();
    let table = state.tables.entry(entity).or_default();
    let before = table.len();
    table.retain(|r| r["id"] != json!(id));
    if table.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({ "message": "deleted" })).into_response()
}

async fn stats(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    let mut stats = serde_json::Map::new();
    for &entity in EntityType::all() {
        let records = state.tables.get(&entity).cloned().unwrap_or_default();
        let active_status = entity.schema().active_status;
        let active = records
            .iter()
            .filter(|r| r["status"] == json!(active_status))
            .count();
        stats.insert(entity.path().to_string(), json!(records.len()));
        stats.insert(format!("active_{}", entity.path()), json!(active));
    }
    Json(Value::Object(stats)).into_response()
}
