//! Typed equality filters
//!
//! Request bodies carry a field name, a raw string value and an optional type
//! tag. [`build_filter`] coerces the raw value according to the tag and
//! produces a [`Filter`] the query engine can hand to the database.
//!
//! | Tag | Filter value |
//! |-----|--------------|
//! | `string` | raw value unchanged |
//! | `number` | decimal number (`Int` when it fits, otherwise `Float`) |
//! | `identifier` | 24-hex [`ObjectId`] |
//! | (absent) | same as `string` |
//!
//! An absent or empty field name yields the empty filter, which matches every
//! document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::object_id::ObjectId;
use crate::value::{Document, DocumentValue, ID_FIELD};

/// How the raw filter value should be interpreted.
///
/// Serializes lowercase; deserializes through [`FromStr`], so request bodies
/// get the same case-insensitive names and short forms as the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Use the raw string as-is
    String,
    /// Parse as a decimal number
    Number,
    /// Parse as a 24-hex identifier
    Identifier,
    /// No tag supplied; treated as `String`
    #[default]
    Unspecified,
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(ValueType::String),
            "number" | "num" => Ok(ValueType::Number),
            "identifier" | "objectid" | "id" => Ok(ValueType::Identifier),
            "" | "unspecified" => Ok(ValueType::Unspecified),
            other => Err(Error::invalid_input(format!(
                "unknown value type '{}' (expected string, number or identifier)",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Identifier => "identifier",
            ValueType::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

/// Loosely-typed filter input as it arrives from a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Field to compare; absent means "match everything"
    #[serde(default, alias = "key")]
    pub field: Option<String>,
    /// Raw comparison value
    #[serde(default, alias = "value")]
    pub raw_value: Option<String>,
    /// Interpretation of `raw_value`
    #[serde(default)]
    pub value_type: ValueType,
}

impl FilterSpec {
    /// Build the typed filter this spec describes.
    pub fn build(&self) -> Result<Filter> {
        build_filter(
            self.field.as_deref(),
            self.raw_value.as_deref(),
            self.value_type,
        )
    }
}

/// An equality filter: every listed field must equal its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Document,
}

impl Filter {
    /// The filter that matches every document.
    pub fn all() -> Self {
        Filter::default()
    }

    /// Match a single field.
    pub fn eq(field: impl Into<String>, value: impl Into<DocumentValue>) -> Self {
        let mut conditions = Document::new();
        conditions.insert(field.into(), value.into());
        Filter { conditions }
    }

    /// Match the document whose `_id` equals `id`.
    pub fn by_id(id: impl Into<DocumentValue>) -> Self {
        Filter::eq(ID_FIELD, id)
    }

    /// True when this filter matches every document.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The field/value conditions, in insertion order.
    pub fn conditions(&self) -> &Document {
        &self.conditions
    }

    /// Evaluate the filter against a document, using the store's equality rules.
    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|(path, expected)| {
            let (head, rest) = match path.split_once('.') {
                Some((head, rest)) => (head, Some(rest)),
                None => (path.as_str(), None),
            };
            let found = match (doc.get(head), rest) {
                (Some(value), Some(rest)) => value.lookup(rest),
                (found, None) => found,
                (None, Some(_)) => None,
            };
            match found {
                Some(value) => value.query_eq(expected),
                // A missing field only equals null
                None => expected.is_null(),
            }
        })
    }
}

/// Build a typed equality filter from loosely-typed request fields.
///
/// # Errors
///
/// Returns [`Error::InvalidFilterValue`] when a field is given without a
/// value, or when the value does not parse as its declared type.
pub fn build_filter(
    field: Option<&str>,
    raw_value: Option<&str>,
    value_type: ValueType,
) -> Result<Filter> {
    let field = match field.map(str::trim) {
        None | Some("") => return Ok(Filter::all()),
        Some(field) => field,
    };
    let raw = raw_value
        .ok_or_else(|| Error::invalid_filter_value(field, "", "missing value"))?;
    let value = coerce(field, raw, value_type)?;
    Ok(Filter::eq(field, value))
}

/// Coerce a raw string into a typed value for `field`.
pub fn coerce(field: &str, raw: &str, value_type: ValueType) -> Result<DocumentValue> {
    match value_type {
        ValueType::String | ValueType::Unspecified => Ok(DocumentValue::Str(raw.to_string())),
        ValueType::Number => parse_number(raw)
            .ok_or_else(|| Error::invalid_filter_value(field, raw, "not a decimal number")),
        ValueType::Identifier => ObjectId::parse_hex(raw.trim())
            .map(DocumentValue::Identifier)
            .map_err(|e| Error::invalid_filter_value(field, raw, e.to_string())),
    }
}

fn parse_number(raw: &str) -> Option<DocumentValue> {
    let trimmed = raw.trim();
    let is_decimal = !trimmed.is_empty()
        && trimmed
            .trim_start_matches(&['-', '+'][..])
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !is_decimal {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(DocumentValue::Int(i));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(DocumentValue::Float)
}
