//! Database backend contract
//!
//! A [`Connector`] opens one [`Connection`] per operation from a caller
//! supplied [`Descriptor`]. Connections are never pooled or shared; the
//! gateway closes each one when its operation finishes.
//!
//! Backends:
//! - [`crate::memory::MemoryConnector`]: in-process server, `memory://<name>`
//! - `crate::mongo::MongoConnector` (feature `mongodb`): `mongodb://` and
//!   `mongodb+srv://` via the official driver
//!
//! [`SchemeRouter`] dispatches on the descriptor scheme when more than one
//! backend is available.

use std::fmt;
use std::sync::Arc;

use docdesk_core::{
    CollectionEntry, DatabaseListing, Descriptor, Document, DocumentValue, Error, Filter, Result,
};

/// Order in which a paged read returns documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PageOrder {
    /// Whatever order the server returns (no sort)
    #[default]
    Natural,
    /// Ascending by `_id`
    ById,
}

/// A filtered, optionally paged read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    /// Equality filter
    pub filter: Filter,
    /// Documents to skip
    pub skip: u64,
    /// Maximum documents to return; `None` returns everything after `skip`
    pub limit: Option<u64>,
    /// Sort order
    pub order: PageOrder,
}

/// Opens connections for descriptors it understands.
pub trait Connector: Send + Sync {
    /// Open a connection.
    ///
    /// Implementations report malformed descriptors, unknown hosts and
    /// rejected credentials as [`Error::ConnectionFailure`].
    fn connect(&self, descriptor: &Descriptor) -> Result<Box<dyn Connection>>;
}

/// A single live connection to a document database.
pub trait Connection: Send {
    /// Round-trip to the server to prove the connection works
    fn ping(&self) -> Result<()>;

    /// All databases with their sizes
    fn list_databases(&self) -> Result<DatabaseListing>;

    /// Server statistics for a database, passed through verbatim
    fn database_stats(&self, database: &str) -> Result<Document>;

    /// Collections (and views) in a database
    fn list_collections(&self, database: &str) -> Result<Vec<CollectionEntry>>;

    /// Server statistics for a collection, passed through verbatim
    fn collection_stats(&self, database: &str, collection: &str) -> Result<Document>;

    /// Exact number of documents matching `filter`
    fn count(&self, database: &str, collection: &str, filter: &Filter) -> Result<u64>;

    /// Metadata-based document count; may lag behind concurrent writes
    fn estimated_count(&self, database: &str, collection: &str) -> Result<u64>;

    /// Documents matching a query
    fn find(&self, database: &str, collection: &str, query: &FindQuery) -> Result<Vec<Document>>;

    /// Create an empty collection; fails when it already exists
    fn create_collection(&self, database: &str, collection: &str) -> Result<()>;

    /// Drop a collection; absent collections are not an error
    fn drop_collection(&self, database: &str, collection: &str) -> Result<()>;

    /// Drop a database; absent databases are not an error
    fn drop_database(&self, database: &str) -> Result<()>;

    /// Delete the first document matching `filter`, returning how many were removed
    fn delete_one(&self, database: &str, collection: &str, filter: &Filter) -> Result<u64>;

    /// Delete every document matching `filter`, returning how many were removed
    fn delete_many(&self, database: &str, collection: &str, filter: &Filter) -> Result<u64>;

    /// Set `fields` on the document whose `_id` equals `id`, inserting it when
    /// absent. Returns true when a new document was inserted.
    fn upsert_fields(
        &self,
        database: &str,
        collection: &str,
        id: &DocumentValue,
        fields: &Document,
    ) -> Result<bool>;

    /// Release the connection
    fn close(self: Box<Self>) -> Result<()>;
}

/// Routes descriptors to a backend by URI scheme.
#[derive(Default, Clone)]
pub struct SchemeRouter {
    routes: Vec<(String, Arc<dyn Connector>)>,
}

impl SchemeRouter {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Send descriptors with `scheme` to `connector`
    pub fn route(mut self, scheme: impl Into<String>, connector: Arc<dyn Connector>) -> Self {
        self.routes.push((scheme.into(), connector));
        self
    }

    /// Schemes this router accepts, in registration order
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(scheme, _)| scheme.as_str())
    }
}

impl fmt::Debug for SchemeRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeRouter")
            .field("schemes", &self.schemes().collect::<Vec<_>>())
            .finish()
    }
}

impl Connector for SchemeRouter {
    fn connect(&self, descriptor: &Descriptor) -> Result<Box<dyn Connection>> {
        let scheme = descriptor.scheme().ok_or_else(|| {
            Error::connection(format!("'{}' is not a connection string", descriptor))
        })?;
        let connector = self
            .routes
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(scheme))
            .map(|(_, c)| c)
            .ok_or_else(|| {
                Error::connection(format!(
                    "unsupported scheme '{}' (expected one of: {})",
                    scheme,
                    self.schemes().collect::<Vec<_>>().join(", ")
                ))
            })?;
        connector.connect(descriptor)
    }
}
