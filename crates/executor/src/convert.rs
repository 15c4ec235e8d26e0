//! Error conversion from core error types.
//!
//! This module provides the conversion from [`docdesk_core::Error`] to the
//! executor's [`Error`] type.

use crate::Error;

/// Convert a core error to an executor Error.
///
/// Every field is carried over; only `Driver` is renamed to
/// `DriverFailure`.
impl From<docdesk_core::Error> for Error {
    fn from(err: docdesk_core::Error) -> Self {
        use docdesk_core::Error as CoreError;
        match err {
            CoreError::ConnectionFailure { reason } => Error::ConnectionFailure { reason },
            CoreError::InvalidFilterValue {
                field,
                value,
                reason,
            } => Error::InvalidFilterValue {
                field,
                value,
                reason,
            },
            CoreError::MalformedDocument {
                reason,
                line,
                column,
            } => Error::MalformedDocument {
                reason,
                line,
                column,
            },
            CoreError::MissingIdentifier => Error::MissingIdentifier,
            CoreError::InvalidName { kind, name, reason } => Error::InvalidName {
                kind: kind.to_string(),
                name,
                reason,
            },
            CoreError::InvalidInput { reason } => Error::InvalidInput { reason },
            CoreError::Driver { reason } => Error::DriverFailure { reason },
        }
    }
}

/// Convert a core result to an executor result.
pub fn convert_result<T>(result: docdesk_core::Result<T>) -> crate::Result<T> {
    result.map_err(Error::from)
}
