//! Console - the application core driving every user action
//!
//! `Console` owns the record store, the gateway and the explicit [`UiState`].
//! The store is only written here, and only from a successful list response.
//! Each mutating action is followed by a re-list of the same entity type
//! before the dialog closes or the row disappears.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::controller::{Dialog, DialogMode, FormError, SaveRequest};
use crate::core::gateway::{Gateway, GatewayError, ServerStats};
use crate::core::presenter::{self, RowAction, TableView};
use crate::core::record::{Record, RecordId};
use crate::core::resolver::Resolver;
use crate::core::store::{RecordStore, Statistics};
use crate::schema::EntityType;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// User-visible notification banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// A delete awaiting explicit confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTarget {
    pub entity: EntityType,
    pub id: RecordId,
}

/// All UI state, as one serializable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    /// Selected tab
    pub tab: EntityType,
    pub dialog: Dialog,
    pub pending_delete: Option<DeleteTarget>,
    pub notification: Option<Notification>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: EntityType::Customers,
            dialog: Dialog::Closed,
            pending_delete: None,
            notification: None,
        }
    }
}

/// Errors surfaced by console actions
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("no {entity} record with id {id}")]
    RecordNotFound { entity: EntityType, id: RecordId },

    #[error("no delete is awaiting confirmation")]
    NoPendingDelete,
}

/// Application core over a gateway
pub struct Console<G> {
    gateway: G,
    store: RecordStore,
    state: UiState,
    last_session: u64,
}

impl<G: Gateway> Console<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            store: RecordStore::new(),
            state: UiState::default(),
            last_session: 0,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store)
    }

    /// Client-side counts from the current snapshots
    pub fn statistics(&self) -> Statistics {
        self.store.statistics()
    }

    /// Server-side counts from `GET /stats`
    pub async fn server_stats(&self) -> Result<ServerStats, GatewayError> {
        self.gateway.stats().await
    }

    pub fn select_tab(&mut self, entity: EntityType) {
        self.state.tab = entity;
    }

    pub fn render(&self, entity: EntityType) -> TableView {
        presenter::render(entity, &self.store)
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Success => tracing::info!(%message, "notification"),
            Severity::Error => tracing::warn!(%message, "notification"),
        }
        self.state.notification = Some(Notification { severity, message });
    }

    // =====================================================================
    // Refresh
    // =====================================================================

    /// Re-list one entity type and swap its snapshot, without notifying
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn reload(&mut self, entity: EntityType) -> Result<(), GatewayError> {
        let records = self.gateway.list(entity).await?;
        tracing::debug!(%entity, count = records.len(), "snapshot replaced");
        self.store.replace(entity, records);
        Ok(())
    }

    /// Re-list one entity type; a failure sets an error notification
    pub async fn refresh(&mut self, entity: EntityType) -> Result<(), GatewayError> {
        self.reload(entity).await.map_err(|e| {
            self.notify(
                Severity::Error,
                format!("Could not load {}: {}", entity.plural(), e),
            );
            e
        })
    }

    /// Re-list the types `entity` references, then `entity` itself
    ///
    /// A referenced type that fails to load keeps its previous (possibly
    /// empty) snapshot and its ids render raw. Only a failure of `entity`
    /// itself is returned.
    pub async fn refresh_with_references(&mut self, entity: EntityType) -> Result<(), GatewayError> {
        for target in self.reference_targets(entity) {
            if let Err(e) = self.reload(target).await {
                tracing::warn!(
                    %target,
                    stale = self.store.is_loaded(target),
                    error = %e,
                    "referenced collection unavailable"
                );
            }
        }
        self.refresh(entity).await
    }

    /// Distinct types the reference fields of `entity` point at, excluding itself
    fn reference_targets(&self, entity: EntityType) -> Vec<EntityType> {
        let mut targets: Vec<EntityType> = entity
            .schema()
            .references()
            .map(|(_, t)| t)
            .filter(|&t| t != entity)
            .collect();
        targets.sort();
        targets.dedup();
        targets
    }

    /// Re-list every entity type; all are attempted, the first error is returned
    pub async fn refresh_all(&mut self) -> Result<(), GatewayError> {
        let mut first_error = None;
        for &entity in EntityType::all() {
            if let Err(e) = self.refresh(entity).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    // =====================================================================
    // Dialog workflow
    // =====================================================================

    fn next_session(&mut self) -> u64 {
        self.last_session += 1;
        self.last_session
    }

    /// Open a create dialog seeded with the schema defaults
    pub fn open_create(&mut self, entity: EntityType) {
        let session = self.next_session();
        self.state.dialog = Dialog::open_create(entity, session);
    }

    /// Open an edit dialog on a record from the current snapshot
    pub fn open_edit(&mut self, entity: EntityType, id: RecordId) -> Result<(), ConsoleError> {
        let record = self
            .store
            .get(entity, id)
            .ok_or(ConsoleError::RecordNotFound { entity, id })?;
        let session = self.last_session + 1;
        let dialog = Dialog::open_edit(entity, record, session)?;
        self.last_session = session;
        self.state.dialog = dialog;
        Ok(())
    }

    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), ConsoleError> {
        Ok(self.state.dialog.set_field(name, value)?)
    }

    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<(), ConsoleError> {
        Ok(self.state.dialog.set_input(name, raw)?)
    }

    /// Close the dialog without saving
    pub fn cancel(&mut self) {
        let dialog = std::mem::take(&mut self.state.dialog);
        self.state.dialog = dialog.cancel();
    }

    /// Validate the draft and capture it for sending
    ///
    /// Missing required fields produce an error notification; the dialog
    /// stays open with the draft untouched.
    pub fn begin_save(&mut self) -> Result<SaveRequest, ConsoleError> {
        match self.state.dialog.save_request() {
            Ok(request) => Ok(request),
            Err(e) => {
                self.notify(Severity::Error, format!("Cannot save: {}", e));
                Err(e.into())
            }
        }
    }

    /// Issue the create or update call for a captured draft
    pub async fn submit(&self, request: &SaveRequest) -> Result<Record, GatewayError> {
        match request.mode {
            DialogMode::Create => self.gateway.create(request.entity, &request.draft).await,
            DialogMode::Edit { id } => {
                self.gateway
                    .update(request.entity, id, &request.draft)
                    .await
            }
        }
    }

    /// Apply the outcome of a submitted save
    ///
    /// Success re-lists the entity type, then closes the dialog that issued
    /// the save. Failure keeps the dialog open with its draft. A result for a
    /// dialog that is no longer current only refreshes the store.
    pub async fn complete_save(
        &mut self,
        request: SaveRequest,
        result: Result<Record, GatewayError>,
    ) -> Result<Record, ConsoleError> {
        let current = self.state.dialog.session() == Some(request.session);
        if !current {
            tracing::debug!(session = request.session, "save completed for a disposed dialog");
        }

        match result {
            Ok(saved) => {
                let refreshed = if current {
                    self.refresh(request.entity).await
                } else {
                    self.reload(request.entity).await
                };

                let dialog = std::mem::take(&mut self.state.dialog);
                self.state.dialog = dialog.complete(request.session, true);

                if !current {
                    return Ok(saved);
                }
                let verb = match request.mode {
                    DialogMode::Create => "created",
                    DialogMode::Edit { .. } => "updated",
                };
                match refreshed {
                    Ok(()) => self.notify(
                        Severity::Success,
                        format!("{} {}", capitalize(request.entity.singular()), verb),
                    ),
                    Err(e) => self.notify(
                        Severity::Error,
                        format!(
                            "{} {}, but the list could not be refreshed: {}",
                            capitalize(request.entity.singular()),
                            verb,
                            e
                        ),
                    ),
                }
                Ok(saved)
            }
            Err(e) => {
                if current {
                    self.notify(
                        Severity::Error,
                        format!("Failed to save {}: {}", request.entity.singular(), e),
                    );
                }
                Err(e.into())
            }
        }
    }

    /// Save the open dialog: validate, submit, then apply the outcome
    pub async fn save(&mut self) -> Result<Record, ConsoleError> {
        let request = self.begin_save()?;
        let result = self.submit(&request).await;
        self.complete_save(request, result).await
    }

    // =====================================================================
    // Row actions
    // =====================================================================

    /// Dispatch a row action from the presenter
    pub fn apply(&mut self, action: RowAction) -> Result<(), ConsoleError> {
        match action {
            RowAction::Edit { entity, id } => self.open_edit(entity, id),
            RowAction::Delete { entity, id } => {
                self.request_delete(entity, id);
                Ok(())
            }
        }
    }

    /// Stage a delete; nothing is sent until [`Console::confirm_delete`]
    pub fn request_delete(&mut self, entity: EntityType, id: RecordId) {
        self.state.pending_delete = Some(DeleteTarget { entity, id });
    }

    /// Drop the staged delete without issuing any call
    pub fn dismiss_delete(&mut self) {
        self.state.pending_delete = None;
    }

    /// Issue the staged delete, then re-list on success
    pub async fn confirm_delete(&mut self) -> Result<(), ConsoleError> {
        let target = self
            .state
            .pending_delete
            .take()
            .ok_or(ConsoleError::NoPendingDelete)?;

        match self.gateway.delete(target.entity, target.id).await {
            Ok(()) => {
                match self.refresh(target.entity).await {
                    Ok(()) => self.notify(
                        Severity::Success,
                        format!("{} {} deleted", capitalize(target.entity.singular()), target.id),
                    ),
                    Err(e) => self.notify(
                        Severity::Error,
                        format!(
                            "{} {} deleted, but the list could not be refreshed: {}",
                            capitalize(target.entity.singular()),
                            target.id,
                            e
                        ),
                    ),
                }
                Ok(())
            }
            Err(e) => {
                self.notify(
                    Severity::Error,
                    format!("Failed to delete {} {}: {}", target.entity.singular(), target.id, e),
                );
                Err(e.into())
            }
        }
    }
}

/// Upper-case the first character
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
