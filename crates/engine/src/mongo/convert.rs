//! Conversions between BSON and document values
//!
//! | BSON | DocumentValue |
//! |------|---------------|
//! | Int32, Int64 | Int |
//! | Double | Float |
//! | ObjectId | Identifier |
//! | DateTime | Date (millisecond precision) |
//! | Timestamp | Object `{t, i}` |
//! | Undefined | Null |
//! | Binary, Decimal128, Regex, code, keys | Str (display form, lossy) |
//!
//! Going the other way, `Int` becomes Int32 when it fits, otherwise Int64.

use bson::{Bson, Document as BsonDocument};
use chrono::{TimeZone, Utc};
use mongodb::error::{ErrorKind, WriteFailure};
use tracing::warn;

use docdesk_core::{Document, DocumentValue, Error, Filter, ObjectId};

/// Server error code for a missing namespace
pub(crate) const NAMESPACE_NOT_FOUND: i32 = 26;

pub(crate) fn to_bson(value: &DocumentValue) -> Bson {
    match value {
        DocumentValue::Null => Bson::Null,
        DocumentValue::Bool(b) => Bson::Boolean(*b),
        DocumentValue::Int(i) => match i32::try_from(*i) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(*i),
        },
        DocumentValue::Float(f) => Bson::Double(*f),
        DocumentValue::Str(s) => Bson::String(s.clone()),
        DocumentValue::Identifier(id) => Bson::ObjectId(bson::oid::ObjectId::from_bytes(id.bytes())),
        DocumentValue::Date(d) => Bson::DateTime(bson::DateTime::from_millis(d.timestamp_millis())),
        DocumentValue::Array(items) => Bson::Array(items.iter().map(to_bson).collect()),
        DocumentValue::Object(doc) => Bson::Document(to_bson_document(doc)),
    }
}

pub(crate) fn to_bson_document(doc: &Document) -> BsonDocument {
    doc.iter().map(|(k, v)| (k.clone(), to_bson(v))).collect()
}

pub(crate) fn filter_to_bson(filter: &Filter) -> BsonDocument {
    to_bson_document(filter.conditions())
}

pub(crate) fn from_bson(value: Bson) -> DocumentValue {
    match value {
        Bson::Null | Bson::Undefined => DocumentValue::Null,
        Bson::Boolean(b) => DocumentValue::Bool(b),
        Bson::Int32(i) => DocumentValue::Int(i64::from(i)),
        Bson::Int64(i) => DocumentValue::Int(i),
        Bson::Double(f) => DocumentValue::Float(f),
        Bson::String(s) => DocumentValue::Str(s),
        Bson::ObjectId(oid) => DocumentValue::Identifier(ObjectId::from_bytes(oid.bytes())),
        Bson::DateTime(dt) => match Utc.timestamp_millis_opt(dt.timestamp_millis()).single() {
            Some(d) => DocumentValue::Date(d),
            None => {
                warn!(target: "docdesk::mongo", millis = dt.timestamp_millis(), "Date out of range, kept as text");
                DocumentValue::Str(dt.to_string())
            }
        },
        Bson::Timestamp(ts) => {
            let mut doc = Document::new();
            doc.insert("t".into(), i64::from(ts.time).into());
            doc.insert("i".into(), i64::from(ts.increment).into());
            DocumentValue::Object(doc)
        }
        Bson::Array(items) => DocumentValue::Array(items.into_iter().map(from_bson).collect()),
        Bson::Document(doc) => DocumentValue::Object(from_bson_document(doc)),
        other => {
            warn!(target: "docdesk::mongo", bson_type = ?other.element_type(), "Unsupported BSON type, kept as text");
            DocumentValue::Str(other.to_string())
        }
    }
}

pub(crate) fn from_bson_document(doc: BsonDocument) -> Document {
    doc.into_iter().map(|(k, v)| (k, from_bson(v))).collect()
}

/// Non-negative integer from any numeric BSON value
pub(crate) fn bson_u64(value: Option<&Bson>) -> u64 {
    match value {
        Some(Bson::Int32(i)) => u64::try_from(*i).unwrap_or(0),
        Some(Bson::Int64(i)) => u64::try_from(*i).unwrap_or(0),
        Some(Bson::Double(f)) if *f > 0.0 => *f as u64,
        _ => 0,
    }
}

/// Map a driver error onto the core taxonomy.
///
/// Anything that means "could not reach or log into the server" is a
/// connection failure; server-side errors keep their native message.
pub(crate) fn map_error(err: mongodb::error::Error) -> Error {
    match err.kind.as_ref() {
        ErrorKind::Authentication { .. }
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::Io(_) => Error::connection(err.to_string()),
        ErrorKind::Command(command) => Error::driver(command.message.clone()),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Error::driver(write.message.clone()),
        _ => Error::driver(err.to_string()),
    }
}

/// True when the server reported a missing namespace
pub(crate) fn is_namespace_not_found(err: &mongodb::error::Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(command) if command.code == NAMESPACE_NOT_FOUND)
}
