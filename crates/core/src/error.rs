//! Error types for docdesk
//!
//! This module defines every failure the data-access core can produce.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Higher layers convert these into their own serializable error shape; the
//! variants here keep enough structure (field names, positions) for that
//! conversion to stay lossless.

use thiserror::Error;

/// Result type alias for docdesk core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the data-access core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Opening a connection failed (malformed descriptor, unreachable host,
    /// rejected credentials)
    #[error("connection failure: {reason}")]
    ConnectionFailure {
        /// Message from the underlying failure
        reason: String,
    },

    /// A raw filter value could not be coerced into its declared type
    #[error("invalid filter value {value:?} for field '{field}': {reason}")]
    InvalidFilterValue {
        /// Field the filter applies to
        field: String,
        /// Raw value as supplied
        value: String,
        /// Why coercion failed
        reason: String,
    },

    /// Editable document text could not be parsed
    #[error("malformed document at line {line}, column {column}: {reason}")]
    MalformedDocument {
        /// What the parser expected or found
        reason: String,
        /// 1-based line of the failure
        line: usize,
        /// 1-based column of the failure
        column: usize,
    },

    /// An update was submitted without an `_id` field
    #[error("document has no _id field")]
    MissingIdentifier,

    /// A database or collection name breaks the naming rules
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        /// "database" or "collection"
        kind: &'static str,
        /// Rejected name
        name: String,
        /// Which rule it breaks
        reason: String,
    },

    /// A request argument is out of range (page size, page index)
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What is wrong with the argument
        reason: String,
    },

    /// Any other error reported by the database, with its native message
    #[error("{reason}")]
    Driver {
        /// Native driver message
        reason: String,
    },
}

impl Error {
    /// Create a ConnectionFailure error
    pub fn connection(reason: impl Into<String>) -> Self {
        Error::ConnectionFailure {
            reason: reason.into(),
        }
    }

    /// Create a Driver error
    pub fn driver(reason: impl Into<String>) -> Self {
        Error::Driver {
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an InvalidFilterValue error
    pub fn invalid_filter_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidFilterValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True when the caller should prompt for a new connection string
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Error::ConnectionFailure { .. })
    }
}
