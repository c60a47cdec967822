//! Field descriptors - the declarative building blocks of an entity schema

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use super::registry::EntityType;

/// A single allowed value of a select field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Wire value (sent to and received from the server)
    pub value: &'static str,
    /// Human-readable label for prompts
    pub label: &'static str,
}

impl SelectOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// How a field is edited and what shape its value takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text
    Text,
    /// Numeric input; `integer` restricts it to whole numbers
    Number { integer: bool },
    /// One value out of a fixed set
    Select { options: &'static [SelectOption] },
    /// Id of a record in another (or the same) entity type
    Reference { target: EntityType },
    /// Calendar date, optionally with a time component
    Date,
}

/// Declared default for a field in a fresh record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// Empty string
    Empty,
    /// JSON null
    Null,
    /// A fixed string (select fields use one of their options)
    Str(&'static str),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Empty => Value::String(String::new()),
            DefaultValue::Null => Value::Null,
            DefaultValue::Str(s) => Value::String(s.to_string()),
        }
    }
}

/// Complete description of one field of an entity type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Wire name, identical to the server's field name
    pub name: &'static str,
    /// Display label
    pub label: &'static str,
    pub kind: FieldKind,
    #[serde(serialize_with = "serialize_default")]
    pub default: DefaultValue,
    pub required: bool,
}

fn serialize_default<S: Serializer>(default: &DefaultValue, s: S) -> Result<S::Ok, S::Error> {
    default.to_value().serialize(s)
}

impl FieldDescriptor {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            default: DefaultValue::Empty,
            required: false,
        }
    }

    pub const fn integer(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number { integer: true },
            default: DefaultValue::Null,
            required: false,
        }
    }

    pub const fn float(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number { integer: false },
            default: DefaultValue::Null,
            required: false,
        }
    }

    /// Select field; the first option is the default
    pub const fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [SelectOption],
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Select { options },
            default: DefaultValue::Str(options[0].value),
            required: false,
        }
    }

    pub const fn reference(name: &'static str, label: &'static str, target: EntityType) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Reference { target },
            default: DefaultValue::Null,
            required: false,
        }
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Date,
            default: DefaultValue::Null,
            required: false,
        }
    }

    /// Override the declared default (select fields whose normal value is not listed first)
    pub const fn with_default(mut self, value: &'static str) -> Self {
        self.default = DefaultValue::Str(value);
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Target entity type for reference fields
    pub fn reference_target(&self) -> Option<EntityType> {
        match self.kind {
            FieldKind::Reference { target } => Some(target),
            _ => None,
        }
    }

    /// Allowed values for select fields
    pub fn options(&self) -> &'static [SelectOption] {
        match self.kind {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }

    /// Whether a value counts as "not filled in" for required-field checks
    pub fn is_missing(&self, value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    /// Parse raw user input (CLI flag or prompt) into a wire value
    ///
    /// Empty input maps to the field's notion of "nothing": an empty string
    /// for text, null for everything else.
    pub fn parse_input(&self, raw: &str) -> Result<Value, FieldError> {
        let input = raw.trim();

        match self.kind {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            _ if input.is_empty() => Ok(Value::Null),
            FieldKind::Number { integer: true } => input
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| self.invalid(input, "expected a whole number")),
            FieldKind::Number { integer: false } => input
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| self.invalid(input, "expected a number")),
            FieldKind::Select { options } => options
                .iter()
                .find(|o| o.value == input)
                .map(|o| Value::String(o.value.to_string()))
                .ok_or_else(|| {
                    let allowed: Vec<&str> = options.iter().map(|o| o.value).collect();
                    self.invalid(input, &format!("expected one of: {}", allowed.join(", ")))
                }),
            FieldKind::Reference { target } => input
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| self.invalid(input, &format!("expected a {} id", target.singular()))),
            FieldKind::Date => {
                if NaiveDate::parse_from_str(input, "%Y-%m-%d").is_ok()
                    || NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S").is_ok()
                    || chrono::DateTime::parse_from_rfc3339(input).is_ok()
                {
                    Ok(Value::String(input.to_string()))
                } else {
                    Err(self.invalid(input, "expected a date as YYYY-MM-DD"))
                }
            }
        }
    }

    fn invalid(&self, value: &str, reason: &str) -> FieldError {
        FieldError::InvalidValue {
            field: self.name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Render a wire value for display (null becomes "-")
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) if s.is_empty() => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Errors raised while turning user input into field values
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}
