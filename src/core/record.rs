//! Record - a schema-shaped entity record as exchanged with the server

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned record identifier
///
/// Unique within one entity type and immutable once assigned. The client
/// never invents ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Interpret a wire value as an id (reference fields hold integers)
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_i64().map(Self)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| format!("Invalid record id: '{}'", s))
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One record of any entity type
///
/// Field values are kept as JSON values keyed by their wire name; the id is
/// split out because only the server may assign it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,

    #[serde(flatten)]
    values: Map<String, Value>,
}

impl Record {
    pub fn from_parts(id: Option<RecordId>, values: Map<String, Value>) -> Self {
        Self { id, values }
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Replace a single field value
    pub fn set(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Same record without its id - the body sent on create/update
    pub fn without_id(&self) -> Record {
        Record {
            id: None,
            values: self.values.clone(),
        }
    }

    /// Field values equal, ignoring the id
    pub fn same_fields(&self, other: &Record) -> bool {
        self.values == other.values
    }
}
