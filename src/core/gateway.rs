//! CRUD gateway - maps entity operations onto the REST backend
//!
//! Every operation is a single request. Nothing is retried and a failure is
//! returned to the caller exactly once.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::core::record::{Record, RecordId};
use crate::schema::EntityType;

/// Aggregate counts reported by `GET /stats`, shown verbatim
pub type ServerStats = BTreeMap<String, serde_json::Value>;

/// Broad failure category used for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network unreachable, timeout, or a non-success status
    Transport,
    /// The server rejected a malformed or incomplete record
    Validation,
}

/// Errors returned by gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{method} {url} failed: {source}")]
    Network {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
    },

    #[error("server rejected the record ({status}): {detail}")]
    Validation { status: StatusCode, detail: String },

    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation { .. } => ErrorKind::Validation,
            _ => ErrorKind::Transport,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

/// Entity operations against the backend
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /{entity}`
    async fn list(&self, entity: EntityType) -> Result<Vec<Record>, GatewayError>;

    /// `POST /{entity}` - returns the created record with its server id
    async fn create(&self, entity: EntityType, record: &Record) -> Result<Record, GatewayError>;

    /// `PUT /{entity}/{id}` - full-record replacement
    async fn update(
        &self,
        entity: EntityType,
        id: RecordId,
        record: &Record,
    ) -> Result<Record, GatewayError>;

    /// `DELETE /{entity}/{id}`
    async fn delete(&self, entity: EntityType, id: RecordId) -> Result<(), GatewayError>;

    /// `GET /stats`
    async fn stats(&self) -> Result<ServerStats, GatewayError>;
}

/// Gateway speaking REST/JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| GatewayError::Network {
                method: Method::GET,
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, entity: EntityType) -> String {
        format!("{}/{}", self.base_url, entity.path())
    }

    fn item_url(&self, entity: EntityType, id: RecordId) -> String {
        format!("{}/{}/{}", self.base_url, entity.path(), id)
    }

    /// Send a request and check its status
    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<&Record>,
    ) -> Result<reqwest::Response, GatewayError> {
        tracing::debug!(%method, %url, "sending request");

        let mut request: RequestBuilder = self.client.request(method.clone(), &url);
        if let Some(record) = body {
            request = request.json(&record.without_id());
        }

        let response = request.send().await.map_err(|source| {
            tracing::warn!(%method, %url, error = %source, "request failed");
            GatewayError::Network {
                method: method.clone(),
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(%method, %url, %status, "non-success status");
        if body.is_some() && is_validation_status(status) {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Validation {
                status,
                detail: validation_detail(&detail),
            });
        }

        Err(GatewayError::Status {
            method,
            url,
            status,
        })
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        response.json::<T>().await.map_err(|e| GatewayError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list(&self, entity: EntityType) -> Result<Vec<Record>, GatewayError> {
        let url = self.collection_url(entity);
        let response = self.send(Method::GET, url.clone(), None).await?;
        let records: Vec<Record> = Self::decode(&url, response).await?;

        let schema = entity.schema();
        Ok(records.iter().map(|r| schema.project(r)).collect())
    }

    async fn create(&self, entity: EntityType, record: &Record) -> Result<Record, GatewayError> {
        let schema = entity.schema();
        let body = schema.project(record);
        let url = self.collection_url(entity);
        let response = self.send(Method::POST, url.clone(), Some(&body)).await?;
        let created: Record = Self::decode(&url, response).await?;
        Ok(schema.project(&created))
    }

    async fn update(
        &self,
        entity: EntityType,
        id: RecordId,
        record: &Record,
    ) -> Result<Record, GatewayError> {
        let schema = entity.schema();
        let body = schema.project(record);
        let url = self.item_url(entity, id);
        let response = self.send(Method::PUT, url.clone(), Some(&body)).await?;
        let updated: Record = Self::decode(&url, response).await?;
        Ok(schema.project(&updated))
    }

    async fn delete(&self, entity: EntityType, id: RecordId) -> Result<(), GatewayError> {
        let url = self.item_url(entity, id);
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn stats(&self) -> Result<ServerStats, GatewayError> {
        let url = format!("{}/stats", self.base_url);
        let response = self.send(Method::GET, url.clone(), None).await?;
        Self::decode(&url, response).await
    }
}

/// Statuses a REST backend uses for malformed input
fn is_validation_status(status: StatusCode) -> bool {
    status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY
}

/// Pull a readable message out of an error body
///
/// Prefers a top-level `detail` member (string or structured), falling back to
/// the raw body.
fn validation_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ if body.trim().is_empty() => "no details".to_string(),
        _ => body.trim().to_string(),
    }
}
