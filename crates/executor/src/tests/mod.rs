//! Test modules for the executor crate.


use std::sync::Arc;

use docdesk_engine::{MemoryConnector, MemoryServer};

use crate::Executor;

pub(crate) const URI: &str = "memory://local";

/// An executor over a fresh in-memory server named `local`.
pub(crate) fn memory_executor() -> (Executor, Arc<MemoryServer>) {
    let connector = MemoryConnector::new();
    let server = connector.add_server("local");
    (Executor::new(Arc::new(connector)), server)
}
