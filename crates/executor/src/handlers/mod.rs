//! Command handlers organized by target.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `server` | Connect, ListDatabases |
//! | `database` | ListCollections, NewDatabase, DropDatabase |
//! | `collection` | CollectionInfo, FindDocuments, NewCollection, DropCollection |
//! | `document` | GetDocument, UpdateDocument, DeleteDocument |
//!
//! Each handler opens its own connection through the gateway; nothing is
//! shared between commands.

pub mod collection;
pub mod database;
pub mod document;
pub mod server;

use docdesk_core::filter::coerce;
use docdesk_core::{DocumentValue, ValueType, ID_FIELD};

use crate::convert::convert_result;
use crate::Result;

/// Parse a document id argument, which must be a 24-hex identifier.
pub(crate) fn parse_document_id(raw: &str) -> Result<DocumentValue> {
    convert_result(coerce(ID_FIELD, raw, ValueType::Identifier))
}
