//! Form/dialog controller - create and edit workflows
//!
//! A dialog is either `Closed` or `Open` with a draft. Every open action
//! starts a new session; a save result is only applied to the dialog whose
//! session issued it, so a late response can never touch a dialog that was
//! closed or reopened in the meantime.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::record::{Record, RecordId};
use crate::schema::{empty_record, EntityType, FieldError};

/// Whether the dialog creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DialogMode {
    Create,
    Edit { id: RecordId },
}

/// An open dialog and its unsaved draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenDialog {
    pub session: u64,
    pub entity: EntityType,
    pub mode: DialogMode,
    pub draft: Record,
}

/// Dialog state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Dialog {
    #[default]
    Closed,
    Open(OpenDialog),
}

/// Snapshot of an open dialog handed to the gateway on save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub session: u64,
    pub entity: EntityType,
    pub mode: DialogMode,
    pub draft: Record,
}

/// Errors raised by dialog transitions
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("no dialog is open")]
    NotOpen,

    #[error("{entity} has no field named '{field}'")]
    UnknownField { entity: EntityType, field: String },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("missing required {}: {}", field_noun(.fields), .fields.join(", "))]
    MissingRequired {
        entity: EntityType,
        fields: Vec<String>,
    },

    #[error("cannot edit a {entity} record that has no id")]
    MissingId { entity: EntityType },
}

fn field_noun(fields: &[String]) -> &'static str {
    if fields.len() == 1 {
        "field"
    } else {
        "fields"
    }
}

impl Dialog {
    /// `Closed -> Open(Create)`, draft seeded from the schema defaults
    pub fn open_create(entity: EntityType, session: u64) -> Dialog {
        Dialog::Open(OpenDialog {
            session,
            entity,
            mode: DialogMode::Create,
            draft: empty_record(entity),
        })
    }

    /// `Closed -> Open(Edit)`, draft copied from the stored record
    ///
    /// The draft is projected onto the schema so it has exactly the declared
    /// shape; the stored record itself is never touched.
    pub fn open_edit(entity: EntityType, record: &Record, session: u64) -> Result<Dialog, FormError> {
        let id = record.id().ok_or(FormError::MissingId { entity })?;
        Ok(Dialog::Open(OpenDialog {
            session,
            entity,
            mode: DialogMode::Edit { id },
            draft: entity.schema().project(record),
        }))
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Dialog::Open(_))
    }

    pub fn open(&self) -> Option<&OpenDialog> {
        match self {
            Dialog::Open(open) => Some(open),
            Dialog::Closed => None,
        }
    }

    pub fn session(&self) -> Option<u64> {
        self.open().map(|o| o.session)
    }

    pub fn draft(&self) -> Option<&Record> {
        self.open().map(|o| &o.draft)
    }

    /// Replace one key of the draft
    ///
    /// Only declared fields may be set. Required fields are not checked here.
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        let open = match self {
            Dialog::Open(open) => open,
            Dialog::Closed => return Err(FormError::NotOpen),
        };

        if open.entity.schema().field(name).is_none() {
            return Err(FormError::UnknownField {
                entity: open.entity,
                field: name.to_string(),
            });
        }

        open.draft.set(name, value);
        Ok(())
    }

    /// Parse raw text for a field and store it in the draft
    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        let entity = self.open().map(|o| o.entity).ok_or(FormError::NotOpen)?;
        let field = entity
            .schema()
            .field(name)
            .ok_or_else(|| FormError::UnknownField {
                entity,
                field: name.to_string(),
            })?;

        let value = field.parse_input(raw)?;
        self.set_field(name, value)
    }

    /// Check required fields and capture what should be sent
    pub fn save_request(&self) -> Result<SaveRequest, FormError> {
        let open = self.open().ok_or(FormError::NotOpen)?;

        let missing = open.entity.schema().missing_required(&open.draft);
        if !missing.is_empty() {
            return Err(FormError::MissingRequired {
                entity: open.entity,
                fields: missing.into_iter().map(String::from).collect(),
            });
        }

        Ok(SaveRequest {
            session: open.session,
            entity: open.entity,
            mode: open.mode,
            draft: open.draft.clone(),
        })
    }

    /// `Open -> Closed` on cancel; the draft is dropped
    pub fn cancel(self) -> Dialog {
        Dialog::Closed
    }

    /// Apply a save outcome
    ///
    /// Success closes the dialog, failure leaves it as it was. Outcomes from
    /// another session are ignored.
    pub fn complete(self, session: u64, succeeded: bool) -> Dialog {
        match self {
            Dialog::Open(open) if open.session == session && succeeded => Dialog::Closed,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored_customer() -> Record {
        serde_json::from_value(json!({
            "id": 4,
            "tax_id": "98765432109",
            "name": "Ivan Horvat",
            "address": "Vukovarska 58",
            "customer_kind": "individual",
            "service_package": "Home 500",
            "status": "active",
            "admin_contact": null,
            "technical_contact": "098-123-4567",
            "created_at": "2024-03-01T10:00:00"
        }))
        .unwrap()
    }

    #[test]
    fn test_open_create_seeds_defaults() {
        let dialog = Dialog::open_create(EntityType::Links, 1);
        let draft = dialog.draft().unwrap();
        assert_eq!(draft, &empty_record(EntityType::Links));
        assert_eq!(dialog.open().unwrap().mode, DialogMode::Create);
    }

    #[test]
    fn test_open_edit_copies_record() {
        let stored = stored_customer();
        let mut dialog = Dialog::open_edit(EntityType::Customers, &stored, 2).unwrap();
        assert_eq!(
            dialog.open().unwrap().mode,
            DialogMode::Edit { id: RecordId::new(4) }
        );
        assert!(dialog.draft().unwrap().get("created_at").is_none());

        dialog.set_field("name", json!("Ivan H.")).unwrap();
        assert_eq!(stored.get("name"), Some(&json!("Ivan Horvat")));
        assert_eq!(dialog.draft().unwrap().get("name"), Some(&json!("Ivan H.")));
    }

    #[test]
    fn test_open_edit_requires_id() {
        let record = empty_record(EntityType::Sites);
        assert_eq!(
            Dialog::open_edit(EntityType::Sites, &record, 1),
            Err(FormError::MissingId {
                entity: EntityType::Sites
            })
        );
    }

    #[test]
    fn test_set_field_rejects_undeclared_names() {
        let mut dialog = Dialog::open_create(EntityType::Sites, 1);
        let err = dialog.set_field("created_at", json!("now")).unwrap_err();
        assert!(matches!(err, FormError::UnknownField { .. }));

        let mut closed = Dialog::Closed;
        assert_eq!(closed.set_field("name", json!("x")), Err(FormError::NotOpen));
    }

    #[test]
    fn test_set_input_parses_by_kind() {
        let mut dialog = Dialog::open_create(EntityType::Links, 1);
        dialog.set_input("speed_mbps", "1000").unwrap();
        dialog.set_input("site_a_id", "1").unwrap();
        assert_eq!(dialog.draft().unwrap().get("speed_mbps"), Some(&json!(1000)));
        assert_eq!(dialog.draft().unwrap().get("site_a_id"), Some(&json!(1)));

        let err = dialog.set_input("link_kind", "laser").unwrap_err();
        assert!(matches!(err, FormError::Field(_)));
        assert_eq!(dialog.draft().unwrap().get("link_kind"), Some(&json!("fiber")));
    }

    #[test]
    fn test_save_request_enforces_required_fields() {
        let mut dialog = Dialog::open_create(EntityType::Customers, 3);
        let err = dialog.save_request().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: tax_id, name");

        dialog.set_field("tax_id", json!("12345678901")).unwrap();
        dialog.set_field("name", json!("Acme")).unwrap();
        let request = dialog.save_request().unwrap();
        assert_eq!(request.session, 3);
        assert_eq!(request.mode, DialogMode::Create);
        assert_eq!(request.draft.get("name"), Some(&json!("Acme")));
    }

    #[test]
    fn test_complete_only_applies_to_its_session() {
        let dialog = Dialog::open_create(EntityType::Sites, 7);
        assert!(dialog.clone().complete(7, true) == Dialog::Closed);
        assert!(dialog.clone().complete(7, false).is_open());
        assert_eq!(dialog.clone().complete(6, true), dialog);
        assert_eq!(Dialog::Closed.complete(7, true), Dialog::Closed);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut dialog = Dialog::open_create(EntityType::Sites, 1);
        dialog.set_field("name", json!("POP East")).unwrap();
        assert_eq!(dialog.cancel(), Dialog::Closed);
    }

    #[test]
    fn test_dialog_state_serializes() {
        let dialog = Dialog::open_create(EntityType::Customers, 1);
        let value = serde_json::to_value(&dialog).unwrap();
        assert_eq!(value["state"], json!("open"));
        assert_eq!(value["mode"]["mode"], json!("create"));

        let back: Dialog = serde_json::from_value(value).unwrap();
        assert_eq!(back, dialog);
    }
}
