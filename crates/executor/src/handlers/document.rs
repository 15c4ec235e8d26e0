//! Document-level handlers.

use docdesk_core::{encode_document, Descriptor};
use docdesk_engine::{mutation, query, Gateway};

use super::parse_document_id;
use crate::convert::convert_result;
use crate::config::MAX_DOCUMENT_INDENT;
use crate::{DeskConfig, Output, Result};

/// Handle GetDocument command.
pub fn get_document(
    gateway: &Gateway,
    config: &DeskConfig,
    uri: &Descriptor,
    database: &str,
    collection: &str,
    id: &str,
) -> Result<Output> {
    let id = parse_document_id(id)?;
    let found = convert_result(gateway.with_connection(uri, |conn| {
        query::find_one(conn, database, collection, &id)
    }))?;
    Ok(Output::DocumentText(
        found.map(|doc| encode_document(&doc, config.document_indent.min(MAX_DOCUMENT_INDENT))),
    ))
}

/// Handle UpdateDocument command.
pub fn update_document(
    gateway: &Gateway,
    uri: &Descriptor,
    database: &str,
    collection: &str,
    document: &str,
) -> Result<Output> {
    // Decode before connecting so malformed text never costs a round-trip
    let (id, fields) = convert_result(mutation::prepare_update(document))?;
    convert_result(gateway.with_connection(uri, |conn| {
        mutation::apply_update(conn, database, collection, &id, &fields)
    }))?;
    Ok(Output::Unit)
}

/// Handle DeleteDocument command.
pub fn delete_document(
    gateway: &Gateway,
    uri: &Descriptor,
    database: &str,
    collection: &str,
    id: Option<&str>,
) -> Result<Output> {
    let id = id.map(parse_document_id).transpose()?;
    convert_result(gateway.with_connection(uri, |conn| match &id {
        Some(id) => mutation::delete_one(conn, database, collection, id),
        None => mutation::delete_all(conn, database, collection),
    }))?;
    Ok(Output::Unit)
}
