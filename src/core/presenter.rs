//! Table presenter - renders a collection as rows with row actions

use serde::Serialize;

use crate::core::record::RecordId;
use crate::core::resolver::Resolver;
use crate::core::store::RecordStore;
use crate::schema::EntityType;

/// Text shown in the placeholder row of an empty table
pub const NO_DATA: &str = "No data";

/// Row-scoped action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RowAction {
    /// Open the record in an edit dialog
    Edit { entity: EntityType, id: RecordId },
    /// Ask for confirmation, then delete the record
    Delete { entity: EntityType, id: RecordId },
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum Row {
    Record {
        id: RecordId,
        /// One cell per header, id first
        cells: Vec<String>,
    },
    /// Single row standing in for an empty collection
    Placeholder { message: String },
}

impl Row {
    /// Edit and delete actions for a record row
    pub fn actions(&self, entity: EntityType) -> Vec<RowAction> {
        match self {
            Row::Record { id, .. } => vec![
                RowAction::Edit { entity, id: *id },
                RowAction::Delete { entity, id: *id },
            ],
            Row::Placeholder { .. } => Vec::new(),
        }
    }
}

/// A rendered table for one entity type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub entity: EntityType,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| matches!(r, Row::Placeholder { .. }))
    }
}

/// Render the current snapshot of `entity` using its declared columns
pub fn render(entity: EntityType, store: &RecordStore) -> TableView {
    let schema = entity.schema();
    let resolver = Resolver::new(store);

    let mut headers = vec!["ID".to_string()];
    headers.extend(
        schema
            .columns
            .iter()
            .map(|c| schema.field(c).map(|f| f.label).unwrap_or(*c).to_string()),
    );

    let mut rows: Vec<Row> = store
        .snapshot(entity)
        .iter()
        .filter_map(|record| {
            // Records without an id cannot be acted on and are skipped
            let id = record.id()?;
            let mut cells = vec![id.to_string()];
            for column in schema.columns {
                let cell = match schema.field(column) {
                    Some(field) => resolver.display(field, record.get(column)),
                    None => crate::schema::display_value(record.get(column)),
                };
                cells.push(cell);
            }
            Some(Row::Record { id, cells })
        })
        .collect();

    if rows.is_empty() {
        rows.push(Row::Placeholder {
            message: NO_DATA.to_string(),
        });
    }

    TableView {
        entity,
        headers,
        rows,
    }
}
