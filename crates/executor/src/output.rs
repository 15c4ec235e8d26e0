//! Output enum for command execution results.
//!
//! Every command produces exactly one output type. This mapping is
//! deterministic: the same command always produces the same output variant.

use serde::{Deserialize, Serialize};

use docdesk_core::{CollectionEntry, DatabaseListing, Document, DocumentValue};

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output`
/// variant, documented on the command.
///
/// # Example
///
/// ```text
/// match executor.execute(Command::GetDocument { .. })? {
///     Output::DocumentText(Some(text)) => println!("{}", text),
///     Output::DocumentText(None) => println!("Not found"),
///     _ => unreachable!("GetDocument always returns DocumentText"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (connect, create, drop, update, delete)
    Unit,

    /// Databases on the server with their sizes
    Databases(DatabaseListing),

    /// Statistics and collections of one database
    #[serde(rename_all = "camelCase")]
    Collections {
        /// Server statistics for the database
        database_stats: Document,
        /// Collections in server order
        collections: Vec<CollectionEntry>,
    },

    /// Collection statistics plus a page of documents
    #[serde(rename_all = "camelCase")]
    DocumentPage {
        /// Server statistics for the collection
        collection_stats: Document,
        /// Documents matching the filter across all pages
        documents_total_count: u64,
        /// Documents on this page
        documents: Vec<DocumentValue>,
    },

    /// Editable text of one document; `None` when it does not exist
    DocumentText(Option<String>),
}
