//! Core types for docdesk
//!
//! This crate defines the foundational types used throughout the system:
//! - DocumentValue: semi-structured document value (maps, arrays, scalars,
//!   identifiers, dates)
//! - ObjectId: 12-byte document identifier
//! - codec: editable text form with `IDENT(...)` and `DATE(...)` literals
//! - filter: typed equality filters built from loosely-typed request fields
//! - Descriptor: connection string with redacted logging
//! - Shared request/result types (PageRequest, listings, DocumentPage)
//! - Error: error type for the data-access core

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod descriptor;
pub mod error;
pub mod filter;
pub mod json;
pub mod object_id;
pub mod types;
pub mod value;

pub use codec::{decode, encode, encode_document};
pub use descriptor::Descriptor;
pub use error::{Error, Result};
pub use filter::{build_filter, Filter, FilterSpec, ValueType};
pub use json::{json_to_value, value_to_json};
pub use object_id::{ObjectId, ObjectIdError};
pub use types::{
    CollectionEntry, CollectionListing, DatabaseEntry, DatabaseListing, DocumentPage, PageRequest,
    TargetLocator, DEFAULT_PAGE_SIZE,
};
pub use value::{Document, DocumentValue, ID_FIELD};
