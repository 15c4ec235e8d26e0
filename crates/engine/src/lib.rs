//! Data-access engine for docdesk
//!
//! This crate turns typed requests into database round-trips:
//! - driver: `Connector`/`Connection` backend contract and scheme routing
//! - gateway: one validated, auto-closing connection per operation
//! - query: listings, statistics, counts and paged finds
//! - mutation: namespace management, deletes and text-based updates
//! - names: database and collection naming rules
//! - memory: in-process backend used by tests and demos
//! - mongo (feature `mongodb`): MongoDB backend on the official driver
//!
//! The engine holds no state between operations.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod driver;
pub mod gateway;
pub mod memory;
pub mod mutation;
pub mod names;
pub mod query;

#[cfg(feature = "mongodb")]
pub mod mongo;

pub use driver::{Connection, Connector, FindQuery, PageOrder, SchemeRouter};
pub use gateway::{ConnectionGuard, Gateway};
pub use memory::{MemoryConnector, MemoryServer, MEMORY_SCHEME};
pub use query::{CountMode, QueryOptions};

#[cfg(feature = "mongodb")]
pub use mongo::{MongoConnector, MONGO_SCHEMES};
