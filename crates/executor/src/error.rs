//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Lossless**: No error information is lost in conversion from core errors

use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Connection | `ConnectionFailure` | Unreachable server, rejected credentials, bad descriptor |
/// | Input | `InvalidFilterValue`, `MalformedDocument`, `MissingIdentifier`, `InvalidName`, `InvalidInput` | Request rejected before or while decoding |
/// | Database | `DriverFailure` | Any other error from the server, native message kept |
/// | System | `Io`, `Serialization`, `Internal` | Infrastructure errors |
///
/// A missing document is not an error: `GetDocument` returns
/// `Output::DocumentText(None)`.
///
/// # Example
///
/// ```ignore
/// use docdesk_executor::{Command, Error, Executor};
///
/// match executor.execute(cmd) {
///     Ok(output) => { /* render */ }
///     Err(Error::ConnectionFailure { .. }) => { /* ask for a new connection string */ }
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Connection ====================
    /// Could not open or validate a connection
    #[error("connection failure: {reason}")]
    ConnectionFailure { reason: String },

    // ==================== Input ====================
    /// Filter or id value does not parse as its declared type
    #[error("invalid value {value:?} for field '{field}': {reason}")]
    InvalidFilterValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Edited document text does not parse
    #[error("malformed document at line {line}, column {column}: {reason}")]
    MalformedDocument {
        reason: String,
        line: usize,
        column: usize,
    },

    /// Edited document has no `_id`
    #[error("document has no _id field")]
    MissingIdentifier,

    /// Database or collection name breaks the naming rules
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        kind: String,
        name: String,
        reason: String,
    },

    /// Argument out of range
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    // ==================== Database ====================
    /// Error reported by the database
    #[error("{reason}")]
    DriverFailure { reason: String },

    // ==================== System ====================
    /// File system error (configuration)
    #[error("I/O error: {reason}")]
    Io { reason: String },

    /// Request or response could not be (de)serialized
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Unexpected failure inside an operation
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl Error {
    /// Stable name of the variant, used as `errorKind` in result envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ConnectionFailure { .. } => "ConnectionFailure",
            Error::InvalidFilterValue { .. } => "InvalidFilterValue",
            Error::MalformedDocument { .. } => "MalformedDocument",
            Error::MissingIdentifier => "MissingIdentifier",
            Error::InvalidName { .. } => "InvalidName",
            Error::InvalidInput { .. } => "InvalidInput",
            Error::DriverFailure { .. } => "DriverFailure",
            Error::Io { .. } => "Io",
            Error::Serialization { .. } => "Serialization",
            Error::Internal { .. } => "Internal",
        }
    }

    /// True when the caller should ask for a new connection string
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Error::ConnectionFailure { .. })
    }
}
