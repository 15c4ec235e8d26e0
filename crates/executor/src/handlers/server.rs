//! Server-level handlers.

use docdesk_core::Descriptor;
use docdesk_engine::{query, Gateway};

use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle Connect command.
pub fn connect(gateway: &Gateway, uri: &Descriptor) -> Result<Output> {
    convert_result(gateway.check(uri))?;
    Ok(Output::Unit)
}

/// Handle ListDatabases command.
pub fn list_databases(gateway: &Gateway, uri: &Descriptor) -> Result<Output> {
    let listing = convert_result(gateway.with_connection(uri, query::list_databases))?;
    Ok(Output::Databases(listing))
}
