//! HTTP gateway tests against the in-memory backend

mod common;

use std::time::Duration;

use common::FakeBackend;
use ems::core::{ErrorKind, Gateway, GatewayError, HttpGateway, Record, RecordId};
use ems::schema::{empty_record, EntityType};
use serde_json::json;

fn gateway(backend: &FakeBackend) -> HttpGateway {
    HttpGateway::new(&backend.url, Duration::from_secs(5)).unwrap()
}

fn customer(tax_id: &str, name: &str) -> Record {
    let mut record = empty_record(EntityType::Customers);
    record.set("tax_id", json!(tax_id));
    record.set("name", json!(name));
    record
}

#[tokio::test]
async fn test_list_projects_onto_declared_fields() {
    let backend = FakeBackend::start();
    backend.insert(
        EntityType::Sites,
        json!({ "name": "DC Zagreb Centar", "status": "active" }),
    );

    let sites = gateway(&backend).list(EntityType::Sites).await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].id(), Some(RecordId::new(1)));
    // Server-side extras are dropped, absent declared fields become null
    assert!(sites[0].get("created_at").is_none());
    assert_eq!(sites[0].get("customer_id"), Some(&json!(null)));
}

#[tokio::test]
async fn test_create_sends_body_without_id() {
    let backend = FakeBackend::start();
    let created = gateway(&backend)
        .create(EntityType::Customers, &customer("12345678901", "Acme"))
        .await
        .unwrap();

    assert_eq!(created.id(), Some(RecordId::new(1)));
    assert_eq!(created.get("name"), Some(&json!("Acme")));
    assert_eq!(backend.log(), vec!["POST /customers"]);
}

#[tokio::test]
async fn test_update_is_full_replacement() {
    let backend = FakeBackend::start();
    let id = backend.insert(
        EntityType::Customers,
        json!({ "tax_id": "1", "name": "Old", "address": "Ilica 1" }),
    );

    let mut record = customer("1", "New");
    record.set("address", json!(null));
    let updated = gateway(&backend)
        .update(EntityType::Customers, RecordId::new(id), &record)
        .await
        .unwrap();

    assert_eq!(updated.get("name"), Some(&json!("New")));
    assert_eq!(backend.records(EntityType::Customers)[0]["address"], json!(null));
    assert_eq!(backend.log(), vec![format!("PUT /customers/{id}")]);
}

#[tokio::test]
async fn test_delete_then_missing_is_transport_error() {
    let backend = FakeBackend::start();
    let id = backend.insert(EntityType::Equipment, json!({ "serial_number": "SN1", "site_id": 1 }));
    let gateway = gateway(&backend);

    gateway
        .delete(EntityType::Equipment, RecordId::new(id))
        .await
        .unwrap();
    let err = gateway
        .delete(EntityType::Equipment, RecordId::new(id))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, GatewayError::Status { .. }));
}

#[tokio::test]
async fn test_rejected_body_is_validation_error() {
    let backend = FakeBackend::start();
    let incomplete = empty_record(EntityType::Equipment);

    let err = gateway(&backend)
        .create(EntityType::Equipment, &incomplete)
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("missing: site_id, serial_number"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on the discard port
    let gateway = HttpGateway::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = gateway.list(EntityType::Links).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, GatewayError::Network { .. }));
}

#[tokio::test]
async fn test_server_stats_passed_through() {
    let backend = FakeBackend::start();
    backend.insert(EntityType::Customers, json!({ "tax_id": "1", "name": "A", "status": "active" }));
    backend.insert(EntityType::Customers, json!({ "tax_id": "2", "name": "B", "status": "inactive" }));

    let stats = gateway(&backend).stats().await.unwrap();
    assert_eq!(stats["customers"], json!(2));
    assert_eq!(stats["active_customers"], json!(1));
    assert_eq!(stats["equipment"], json!(0));
}
