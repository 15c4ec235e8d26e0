//! Command enum defining all docdesk operations.
//!
//! Commands are the "instruction set" of docdesk. Every operation the
//! administration backend can perform is a variant of this enum.
//!
//! Commands are:
//! - **Self-contained**: the connection string travels with every command
//! - **Serializable**: can be converted to/from JSON request bodies
//! - **Pure data**: no closures or executable code

use serde::{Deserialize, Serialize};

use docdesk_core::{Descriptor, PageRequest, ValueType};

/// A command is a self-contained, serializable operation.
///
/// # Command Categories
///
/// | Category | Count | Description |
/// |----------|-------|-------------|
/// | Server | 2 | Connectivity check, database listing |
/// | Database | 3 | Collection listing, create, drop |
/// | Collection | 4 | Info, filtered find, create, drop |
/// | Document | 3 | Get as text, update from text, delete |
///
/// # Example
///
/// ```ignore
/// use docdesk_executor::Command;
///
/// let cmd = Command::FindDocuments {
///     uri: "mongodb://localhost:27017".into(),
///     database: "shop".into(),
///     collection: "users".into(),
///     field: Some("age".into()),
///     value: Some("30".into()),
///     value_type: Some(ValueType::Number),
///     page: PageRequest::new(0, 20),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Server (2) ====================
    /// Open, validate and close a connection.
    /// Returns: `Output::Unit`
    Connect { uri: Descriptor },

    /// List every database on the server.
    /// Returns: `Output::Databases`
    ListDatabases { uri: Descriptor },

    // ==================== Database (3) ====================
    /// Database statistics and its collections.
    /// Returns: `Output::Collections`
    ListCollections { uri: Descriptor, database: String },

    /// Create a database, optionally with a first collection.
    /// Returns: `Output::Unit`
    NewDatabase {
        uri: Descriptor,
        database: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        collection: Option<String>,
    },

    /// Drop a database.
    /// Returns: `Output::Unit`
    DropDatabase { uri: Descriptor, database: String },

    // ==================== Collection (4) ====================
    /// Collection statistics plus its documents. Without `page` every
    /// document is returned.
    /// Returns: `Output::DocumentPage`
    CollectionInfo {
        uri: Descriptor,
        database: String,
        collection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        page: Option<PageRequest>,
    },

    /// One page of documents matching an equality filter.
    /// Returns: `Output::DocumentPage`
    FindDocuments {
        uri: Descriptor,
        database: String,
        collection: String,
        #[serde(default, alias = "key", skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, alias = "valueType", skip_serializing_if = "Option::is_none")]
        value_type: Option<ValueType>,
        #[serde(default)]
        page: PageRequest,
    },

    /// Create an empty collection.
    /// Returns: `Output::Unit`
    NewCollection {
        uri: Descriptor,
        database: String,
        collection: String,
    },

    /// Drop a collection.
    /// Returns: `Output::Unit`
    DropCollection {
        uri: Descriptor,
        database: String,
        collection: String,
    },

    // ==================== Document (3) ====================
    /// A document rendered as editable text.
    /// Returns: `Output::DocumentText` (`None` when no document has that id)
    GetDocument {
        uri: Descriptor,
        database: String,
        collection: String,
        id: String,
    },

    /// Apply edited document text (upsert by `_id`).
    /// Returns: `Output::Unit`
    UpdateDocument {
        uri: Descriptor,
        database: String,
        collection: String,
        document: String,
    },

    /// Delete one document, or every document when `id` is absent.
    /// Returns: `Output::Unit`
    DeleteDocument {
        uri: Descriptor,
        database: String,
        collection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl Command {
    /// Variant name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Connect { .. } => "Connect",
            Command::ListDatabases { .. } => "ListDatabases",
            Command::ListCollections { .. } => "ListCollections",
            Command::NewDatabase { .. } => "NewDatabase",
            Command::DropDatabase { .. } => "DropDatabase",
            Command::CollectionInfo { .. } => "CollectionInfo",
            Command::FindDocuments { .. } => "FindDocuments",
            Command::NewCollection { .. } => "NewCollection",
            Command::DropCollection { .. } => "DropCollection",
            Command::GetDocument { .. } => "GetDocument",
            Command::UpdateDocument { .. } => "UpdateDocument",
            Command::DeleteDocument { .. } => "DeleteDocument",
        }
    }

    /// Connection string the command runs against
    pub fn uri(&self) -> &Descriptor {
        match self {
            Command::Connect { uri }
            | Command::ListDatabases { uri }
            | Command::ListCollections { uri, .. }
            | Command::NewDatabase { uri, .. }
            | Command::DropDatabase { uri, .. }
            | Command::CollectionInfo { uri, .. }
            | Command::FindDocuments { uri, .. }
            | Command::NewCollection { uri, .. }
            | Command::DropCollection { uri, .. }
            | Command::GetDocument { uri, .. }
            | Command::UpdateDocument { uri, .. }
            | Command::DeleteDocument { uri, .. } => uri,
        }
    }
}
