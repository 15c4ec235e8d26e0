//! Database-level handlers.

use docdesk_core::Descriptor;
use docdesk_engine::{mutation, query, Gateway};

use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle ListCollections command.
pub fn list_collections(gateway: &Gateway, uri: &Descriptor, database: &str) -> Result<Output> {
    let listing = convert_result(
        gateway.with_connection(uri, |conn| query::list_collections(conn, database)),
    )?;
    Ok(Output::Collections {
        database_stats: listing.stats,
        collections: listing.collections,
    })
}

/// Handle NewDatabase command.
pub fn new_database(
    gateway: &Gateway,
    uri: &Descriptor,
    database: &str,
    collection: Option<&str>,
) -> Result<Output> {
    convert_result(gateway.with_connection(uri, |conn| {
        mutation::create_database(conn, database, collection)
    }))?;
    Ok(Output::Unit)
}

/// Handle DropDatabase command.
pub fn drop_database(gateway: &Gateway, uri: &Descriptor, database: &str) -> Result<Output> {
    convert_result(gateway.with_connection(uri, |conn| mutation::drop_database(conn, database)))?;
    Ok(Output::Unit)
}
