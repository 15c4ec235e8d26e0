//! Collection query engine
//!
//! Read-side operations over an open connection: database and collection
//! listings, statistics passthrough, counts and paged finds.

use tracing::debug;

use docdesk_core::{
    CollectionListing, DatabaseListing, Document, DocumentPage, DocumentValue, Filter,
    PageRequest, Result,
};

use crate::driver::{Connection, FindQuery, PageOrder};

/// How an unfiltered count may be computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CountMode {
    /// Always count matching documents
    #[default]
    Exact,
    /// An empty filter may use collection metadata instead
    AllowEstimate,
}

/// Knobs for paged reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QueryOptions {
    /// Sort order of each page
    pub order: PageOrder,
    /// How the total is counted
    pub count_mode: CountMode,
}

/// All databases on the server
pub fn list_databases(conn: &dyn Connection) -> Result<DatabaseListing> {
    let listing = conn.list_databases()?;
    debug!(target: "docdesk::query", databases = listing.databases.len(), "Listed databases");
    Ok(listing)
}

/// Statistics and collections of one database
pub fn list_collections(conn: &dyn Connection, database: &str) -> Result<CollectionListing> {
    let stats = conn.database_stats(database)?;
    let collections = conn.list_collections(database)?;
    debug!(
        target: "docdesk::query",
        database,
        collections = collections.len(),
        "Listed collections"
    );
    Ok(CollectionListing { stats, collections })
}

/// Collection statistics, verbatim from the server
pub fn collection_stats(conn: &dyn Connection, database: &str, collection: &str) -> Result<Document> {
    conn.collection_stats(database, collection)
}

/// Number of documents matching `filter`.
///
/// Only an empty filter with [`CountMode::AllowEstimate`] uses the
/// metadata-based estimate; any other combination counts exactly.
pub fn count_documents(
    conn: &dyn Connection,
    database: &str,
    collection: &str,
    filter: &Filter,
    mode: CountMode,
) -> Result<u64> {
    if filter.is_empty() && mode == CountMode::AllowEstimate {
        return conn.estimated_count(database, collection);
    }
    conn.count(database, collection, filter)
}

/// One page of documents matching `filter`, plus the filtered total.
///
/// A page past the end is empty, not an error.
pub fn find(
    conn: &dyn Connection,
    database: &str,
    collection: &str,
    filter: &Filter,
    page: PageRequest,
    options: QueryOptions,
) -> Result<DocumentPage> {
    let total = count_documents(conn, database, collection, filter, options.count_mode)?;
    let query = FindQuery {
        filter: filter.clone(),
        skip: page.skip()?,
        limit: Some(page.page_size),
        order: options.order,
    };
    let documents = conn.find(database, collection, &query)?;
    debug!(
        target: "docdesk::query",
        database,
        collection,
        page = page.page_index,
        returned = documents.len(),
        total,
        "Found documents"
    );
    Ok(DocumentPage {
        total,
        documents: documents.into_iter().map(DocumentValue::Object).collect(),
    })
}

/// Every document of a collection
pub fn find_all(
    conn: &dyn Connection,
    database: &str,
    collection: &str,
    order: PageOrder,
) -> Result<DocumentPage> {
    let query = FindQuery {
        order,
        ..FindQuery::default()
    };
    let documents = conn.find(database, collection, &query)?;
    Ok(DocumentPage {
        total: documents.len() as u64,
        documents: documents.into_iter().map(DocumentValue::Object).collect(),
    })
}

/// The document whose `_id` equals `id`, if any
pub fn find_one(
    conn: &dyn Connection,
    database: &str,
    collection: &str,
    id: &DocumentValue,
) -> Result<Option<Document>> {
    let query = FindQuery {
        filter: Filter::by_id(id.clone()),
        limit: Some(1),
        ..FindQuery::default()
    };
    Ok(conn.find(database, collection, &query)?.into_iter().next())
}
