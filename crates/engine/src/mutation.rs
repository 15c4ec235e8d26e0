//! Mutation engine
//!
//! Write-side operations: namespace creation and drops, document deletes,
//! and the text-based document update.
//!
//! Deletes do not report whether anything was removed. Deleting a missing
//! document succeeds.

use tracing::info;

use docdesk_core::{decode, Document, DocumentValue, Error, Filter, Result, ID_FIELD};

use crate::driver::Connection;
use crate::names::{validate_collection_name, validate_database_name};

/// Create a database.
///
/// Databases only exist once they hold a collection, so without
/// `initial_collection` this validates the name and does nothing else.
pub fn create_database(
    conn: &dyn Connection,
    database: &str,
    initial_collection: Option<&str>,
) -> Result<()> {
    validate_database_name(database)?;
    match initial_collection {
        Some(collection) => create_collection(conn, database, collection),
        None => {
            info!(target: "docdesk::mutation", database, "Database will be created on first write");
            Ok(())
        }
    }
}

/// Create an empty collection. An existing collection is a driver error.
pub fn create_collection(conn: &dyn Connection, database: &str, collection: &str) -> Result<()> {
    validate_database_name(database)?;
    validate_collection_name(collection)?;
    conn.create_collection(database, collection)?;
    info!(target: "docdesk::mutation", database, collection, "Created collection");
    Ok(())
}

/// Drop a collection and every document in it
pub fn drop_collection(conn: &dyn Connection, database: &str, collection: &str) -> Result<()> {
    conn.drop_collection(database, collection)?;
    info!(target: "docdesk::mutation", database, collection, "Dropped collection");
    Ok(())
}

/// Drop a database and everything in it
pub fn drop_database(conn: &dyn Connection, database: &str) -> Result<()> {
    conn.drop_database(database)?;
    info!(target: "docdesk::mutation", database, "Dropped database");
    Ok(())
}

/// Delete the document whose `_id` equals `id`
pub fn delete_one(
    conn: &dyn Connection,
    database: &str,
    collection: &str,
    id: &DocumentValue,
) -> Result<()> {
    let deleted = conn.delete_one(database, collection, &Filter::by_id(id.clone()))?;
    info!(target: "docdesk::mutation", database, collection, deleted, "Deleted document");
    Ok(())
}

/// Delete every document in a collection
pub fn delete_all(conn: &dyn Connection, database: &str, collection: &str) -> Result<()> {
    let deleted = conn.delete_many(database, collection, &Filter::all())?;
    info!(target: "docdesk::mutation", database, collection, deleted, "Deleted all documents");
    Ok(())
}

/// Split edited text into the target `_id` and the fields to set.
///
/// # Errors
///
/// - [`Error::MalformedDocument`] when the text does not decode to an object
/// - [`Error::MissingIdentifier`] when the object has no `_id`
pub fn prepare_update(edited: &str) -> Result<(DocumentValue, Document)> {
    let mut doc = match decode(edited)? {
        DocumentValue::Object(doc) => doc,
        other => {
            return Err(Error::MalformedDocument {
                reason: format!("expected an object, found {}", other.type_name()),
                line: 1,
                column: 1,
            })
        }
    };
    let id = doc.shift_remove(ID_FIELD).ok_or(Error::MissingIdentifier)?;
    Ok((id, doc))
}

/// Apply edited document text.
///
/// Every field except `_id` is set on the document with the decoded `_id`;
/// the document is inserted when no such document exists.
pub fn update_one(
    conn: &dyn Connection,
    database: &str,
    collection: &str,
    edited: &str,
) -> Result<()> {
    let (id, fields) = prepare_update(edited)?;
    apply_update(conn, database, collection, &id, &fields)
}

/// Set `fields` on the document with `_id == id`, inserting it when absent.
pub fn apply_update(
    conn: &dyn Connection,
    database: &str,
    collection: &str,
    id: &DocumentValue,
    fields: &Document,
) -> Result<()> {
    let inserted = conn.upsert_fields(database, collection, id, fields)?;
    info!(
        target: "docdesk::mutation",
        database,
        collection,
        fields = fields.len(),
        inserted,
        "Updated document"
    );
    Ok(())
}
