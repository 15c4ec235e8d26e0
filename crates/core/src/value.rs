//! Document value model
//!
//! This module defines:
//! - DocumentValue: closed enum for every value a document can hold
//! - Document: an ordered mapping from field name to DocumentValue
//!
//! ## Value Model
//!
//! The enum has exactly 9 variants:
//! - Null, Bool, Int, Float, Str, Identifier, Date, Array, Object
//!
//! ### Type Rules
//!
//! - Different variants are NEVER equal: `Int(1) != Float(1.0)`, `Identifier(x) != Str(x.to_hex())`
//! - Float equality is IEEE-754: `NaN != NaN`, `-0.0 == 0.0`
//! - Object key order is insertion order and is preserved end to end
//!
//! Query matching is looser than `==`: the document store compares numbers by
//! numeric value regardless of width. That comparison lives in
//! [`DocumentValue::query_eq`] and never leaks into `PartialEq`.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::object_id::ObjectId;

/// An ordered document: field name to value, in insertion order.
pub type Document = IndexMap<String, DocumentValue>;

/// Name of the primary-key field every stored document carries.
pub const ID_FIELD: &str = "_id";

/// A semi-structured document value.
#[derive(Debug, Clone)]
pub enum DocumentValue {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Fixed-length document identifier
    Identifier(ObjectId),
    /// UTC timestamp
    Date(DateTime<Utc>),
    /// Ordered sequence
    Array(Vec<DocumentValue>),
    /// Ordered mapping
    Object(Document),
}

impl PartialEq for DocumentValue {
    fn eq(&self, other: &Self) -> bool {
        use DocumentValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Identifier(a), Identifier(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            _ => false,
        }
    }
}

impl DocumentValue {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            DocumentValue::Null => "Null",
            DocumentValue::Bool(_) => "Bool",
            DocumentValue::Int(_) => "Int",
            DocumentValue::Float(_) => "Float",
            DocumentValue::Str(_) => "Str",
            DocumentValue::Identifier(_) => "Identifier",
            DocumentValue::Date(_) => "Date",
            DocumentValue::Array(_) => "Array",
            DocumentValue::Object(_) => "Object",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, DocumentValue::Null)
    }

    /// Get as &str if this is a Str value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the identifier if this is an Identifier value
    pub fn as_identifier(&self) -> Option<ObjectId> {
        match self {
            DocumentValue::Identifier(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as a document if this is an Object value
    pub fn as_object(&self) -> Option<&Document> {
        match self {
            DocumentValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Consume into a document if this is an Object value
    pub fn into_object(self) -> Option<Document> {
        match self {
            DocumentValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Numeric view of Int and Float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DocumentValue::Int(i) => Some(*i as f64),
            DocumentValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Look up a field by dotted path (`"address.city"`, `"tags.0"`).
    pub fn lookup(&self, path: &str) -> Option<&DocumentValue> {
        path.split('.').try_fold(self, |current, segment| match current {
            DocumentValue::Object(map) => map.get(segment),
            DocumentValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Equality as the document store applies it in an equality filter.
    ///
    /// Numbers compare by value across Int and Float. A stored array matches
    /// when the whole array equals the operand or any element does.
    pub fn query_eq(&self, operand: &DocumentValue) -> bool {
        if scalar_query_eq(self, operand) {
            return true;
        }
        match self {
            DocumentValue::Array(items) => items.iter().any(|item| scalar_query_eq(item, operand)),
            _ => false,
        }
    }

    /// Total ordering following the document store's cross-type sort order:
    /// Null < numbers < strings < objects < arrays < identifiers < booleans < dates.
    pub fn canonical_cmp(&self, other: &DocumentValue) -> Ordering {
        let rank = type_rank(self).cmp(&type_rank(other));
        if rank != Ordering::Equal {
            return rank;
        }
        match (self, other) {
            (DocumentValue::Bool(a), DocumentValue::Bool(b)) => a.cmp(b),
            (DocumentValue::Str(a), DocumentValue::Str(b)) => a.cmp(b),
            (DocumentValue::Identifier(a), DocumentValue::Identifier(b)) => a.cmp(b),
            (DocumentValue::Date(a), DocumentValue::Date(b)) => a.cmp(b),
            (DocumentValue::Array(a), DocumentValue::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.canonical_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (DocumentValue::Object(a), DocumentValue::Object(b)) => {
                for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
                    let ord = ka.cmp(kb).then_with(|| va.canonical_cmp(vb));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            },
        }
    }
}

fn scalar_query_eq(stored: &DocumentValue, operand: &DocumentValue) -> bool {
    match (stored.as_f64(), operand.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => stored == operand,
    }
}

fn type_rank(value: &DocumentValue) -> u8 {
    match value {
        DocumentValue::Null => 0,
        DocumentValue::Int(_) | DocumentValue::Float(_) => 1,
        DocumentValue::Str(_) => 2,
        DocumentValue::Object(_) => 3,
        DocumentValue::Array(_) => 4,
        DocumentValue::Identifier(_) => 5,
        DocumentValue::Bool(_) => 6,
        DocumentValue::Date(_) => 7,
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for DocumentValue {
    fn from(s: &str) -> Self {
        DocumentValue::Str(s.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(s: String) -> Self {
        DocumentValue::Str(s)
    }
}

impl From<bool> for DocumentValue {
    fn from(b: bool) -> Self {
        DocumentValue::Bool(b)
    }
}

impl From<i64> for DocumentValue {
    fn from(i: i64) -> Self {
        DocumentValue::Int(i)
    }
}

impl From<i32> for DocumentValue {
    fn from(i: i32) -> Self {
        DocumentValue::Int(i as i64)
    }
}

impl From<f64> for DocumentValue {
    fn from(f: f64) -> Self {
        DocumentValue::Float(f)
    }
}

impl From<ObjectId> for DocumentValue {
    fn from(id: ObjectId) -> Self {
        DocumentValue::Identifier(id)
    }
}

impl From<DateTime<Utc>> for DocumentValue {
    fn from(d: DateTime<Utc>) -> Self {
        DocumentValue::Date(d)
    }
}

impl From<Vec<DocumentValue>> for DocumentValue {
    fn from(a: Vec<DocumentValue>) -> Self {
        DocumentValue::Array(a)
    }
}

impl From<Document> for DocumentValue {
    fn from(o: Document) -> Self {
        DocumentValue::Object(o)
    }
}

impl From<()> for DocumentValue {
    fn from(_: ()) -> Self {
        DocumentValue::Null
    }
}
