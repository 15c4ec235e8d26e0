//! # docdesk Executor
//!
//! The command layer of docdesk, a data-access backend for document database
//! administration. It provides:
//! - [`Command`]/[`Output`] - serializable operation interface
//! - [`Executor`] - stateless dispatch, one connection per command
//! - [`OperationResult`] - `{success, payload, errorMessage, errorKind}` envelope
//! - [`DeskConfig`] - `docdesk.toml` settings
//!
//! ## Quick Start
//!
//! ```text
//! use docdesk_executor::{Command, Executor};
//!
//! let executor = Executor::new(connector);
//! let result = executor.run(Command::GetDocument {
//!     uri: "mongodb://localhost:27017".into(),
//!     database: "shop".into(),
//!     collection: "users".into(),
//!     id: "507f191e810c19729de860ea".into(),
//! });
//! println!("{}", result.to_json(false));
//! ```
//!
//! ## Operations
//!
//! | Command | Output |
//! |---------|--------|
//! | Connect | Unit |
//! | ListDatabases | Databases |
//! | ListCollections | Collections |
//! | CollectionInfo | DocumentPage |
//! | FindDocuments | DocumentPage |
//! | GetDocument | DocumentText |
//! | UpdateDocument | Unit |
//! | DeleteDocument | Unit |
//! | NewCollection, DropCollection | Unit |
//! | NewDatabase, DropDatabase | Unit |

#![warn(missing_docs)]

mod command;
mod config;
mod convert;
mod error;
mod executor;
mod output;
mod result;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use command::Command;
pub use config::{DeskConfig, CONFIG_FILE_NAME, MAX_DOCUMENT_INDENT};
pub use error::Error;
pub use executor::Executor;
pub use output::Output;
pub use result::OperationResult;

// Value model and inputs from the core, so callers need only this crate
pub use docdesk_core::{
    CollectionEntry, DatabaseEntry, DatabaseListing, Descriptor, Document, DocumentValue,
    ObjectId, PageRequest, ValueType,
};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
