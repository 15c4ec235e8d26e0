//! Connection gateway
//!
//! Every operation gets its own connection: open, validate with a ping, run
//! the operation, close. The connection lives in a [`ConnectionGuard`] so
//! the close happens on success, on error and while unwinding from a panic.
//! A failed close is logged and never replaces the operation's own result.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use tracing::{debug, warn};

use docdesk_core::{Descriptor, Error, Result};

use crate::driver::{Connection, Connector};

/// Opens one validated connection per operation.
#[derive(Clone)]
pub struct Gateway {
    connector: Arc<dyn Connector>,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway").finish_non_exhaustive()
    }
}

impl Gateway {
    /// Create a gateway over a connector
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Gateway { connector }
    }

    /// Open and validate a connection.
    ///
    /// Any failure while opening or pinging becomes
    /// [`Error::ConnectionFailure`] carrying the underlying message.
    pub fn open(&self, descriptor: &Descriptor) -> Result<ConnectionGuard> {
        debug!(target: "docdesk::gateway", descriptor = %descriptor, "Opening connection");
        let conn = self
            .connector
            .connect(descriptor)
            .map_err(into_connection_failure)?;
        let guard = ConnectionGuard { conn: Some(conn) };
        guard.ping().map_err(into_connection_failure)?;
        Ok(guard)
    }

    /// Run `operation` on a fresh connection, closing it afterwards.
    pub fn with_connection<T, F>(&self, descriptor: &Descriptor, operation: F) -> Result<T>
    where
        F: FnOnce(&dyn Connection) -> Result<T>,
    {
        let guard = self.open(descriptor)?;
        operation(&*guard)
    }

    /// Open, validate and close a connection without doing anything else.
    pub fn check(&self, descriptor: &Descriptor) -> Result<()> {
        self.with_connection(descriptor, |_| Ok(()))
    }
}

fn into_connection_failure(err: Error) -> Error {
    match err {
        Error::ConnectionFailure { .. } => err,
        other => Error::connection(other.to_string()),
    }
}

/// A live connection that closes itself when dropped.
pub struct ConnectionGuard {
    conn: Option<Box<dyn Connection>>,
}

impl Deref for ConnectionGuard {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        match &self.conn {
            Some(conn) => conn.as_ref(),
            // Only `drop` takes the connection out
            None => unreachable!("connection used after close"),
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            match conn.close() {
                Ok(()) => debug!(target: "docdesk::gateway", "Closed connection"),
                Err(e) => warn!(target: "docdesk::gateway", error = %e, "Failed to close connection"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryConnector;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn setup() -> (Gateway, Arc<crate::memory::MemoryServer>) {
        let connector = MemoryConnector::new();
        let server = connector.add_server("local");
        (Gateway::new(Arc::new(connector)), server)
    }

    #[test]
    fn closes_after_success() {
        let (gateway, server) = setup();
        let listing = gateway
            .with_connection(&Descriptor::new("memory://local"), |conn| conn.list_databases())
            .unwrap();
        assert!(listing.databases.is_empty());
        assert_eq!(server.open_connections(), 0);
        assert_eq!(server.opened_total(), 1);
    }

    #[test]
    fn closes_after_operation_error() {
        let (gateway, server) = setup();
        let result: Result<()> = gateway
            .with_connection(&Descriptor::new("memory://local"), |_| Err(Error::driver("boom")));
        assert_eq!(result.unwrap_err(), Error::driver("boom"));
        assert_eq!(server.open_connections(), 0);
    }

    #[test]
    fn closes_while_unwinding() {
        let (gateway, server) = setup();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            gateway.with_connection(&Descriptor::new("memory://local"), |_| -> Result<()> {
                panic!("operation panicked")
            })
        }));
        assert!(outcome.is_err());
        assert_eq!(server.open_connections(), 0);
    }

    #[test]
    fn unreachable_server_is_a_connection_failure() {
        let (gateway, server) = setup();
        server.set_offline(true);
        let err = gateway.check(&Descriptor::new("memory://local")).unwrap_err();
        assert!(err.is_connection_failure());
        assert_eq!(server.open_connections(), 0);

        let err = gateway.check(&Descriptor::new("memory://elsewhere")).unwrap_err();
        assert!(err.is_connection_failure());
    }
}
