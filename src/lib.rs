//! docdesk - data-access core for a document database administration tool
//!
//! docdesk lists databases and collections, pages through documents with a
//! single-field equality filter, and edits documents as text with typed
//! `IDENT(hex)` and `DATE(iso)` literals.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use docdesk::{Command, Executor, MongoConnector};
//!
//! let executor = Executor::new(Arc::new(MongoConnector::new()));
//! let result = executor.run(Command::ListDatabases {
//!     uri: "mongodb://localhost:27017".into(),
//! });
//! println!("{}", result.to_json(false));
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which opens one connection
//! per command through a [`Connector`] and always closes it.

// Re-export the public API from docdesk-executor
pub use docdesk_executor::*;

// Document text codec
pub use docdesk_core::{decode, encode, encode_document};

// Backends
pub use docdesk_engine::{Connector, MemoryConnector, MemoryServer, SchemeRouter};
#[cfg(feature = "mongodb")]
pub use docdesk_engine::MongoConnector;
