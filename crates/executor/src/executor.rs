//! The Executor - single entry point to docdesk's engine.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! appropriate handlers and converts results to outputs.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use docdesk_engine::{Connector, Gateway};

use crate::handlers::collection::FindArgs;
use crate::handlers::{collection, database, document, server};
use crate::{Command, DeskConfig, Error, OperationResult, Output, Result};

/// The command executor - single entry point to docdesk's engine.
///
/// The Executor is **stateless**: it holds the connector and configuration
/// but no connections, sessions or caches. Each command opens and closes
/// its own connection.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use docdesk_engine::MemoryConnector;
/// use docdesk_executor::{Command, Executor};
///
/// let connector = MemoryConnector::new();
/// connector.add_server("local");
/// let executor = Executor::new(Arc::new(connector));
///
/// let result = executor.run(Command::ListDatabases {
///     uri: "memory://local".into(),
/// });
/// assert!(result.success);
/// ```
pub struct Executor {
    gateway: Gateway,
    config: DeskConfig,
}

impl Executor {
    /// Create an executor with the default configuration.
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self::with_config(connector, DeskConfig::default())
    }

    /// Create an executor with an explicit configuration.
    pub fn with_config(connector: Arc<dyn Connector>, config: DeskConfig) -> Self {
        Self {
            gateway: Gateway::new(connector),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Execute a single command.
    ///
    /// Returns the command result or an error.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        let started = Instant::now();
        debug!(target: "docdesk::executor", command = name, uri = %cmd.uri(), "Executing");

        let result = self.dispatch(cmd);

        match &result {
            Ok(_) => debug!(
                target: "docdesk::executor",
                command = name,
                elapsed_us = started.elapsed().as_micros() as u64,
                "Completed"
            ),
            Err(e) => debug!(
                target: "docdesk::executor",
                command = name,
                kind = e.kind(),
                error = %e,
                "Failed"
            ),
        }
        result
    }

    /// Execute a command and wrap the outcome in a result envelope.
    ///
    /// Never panics: a panic inside the operation is reported as
    /// [`Error::Internal`]. The connection is still closed while unwinding.
    pub fn run(&self, cmd: Command) -> OperationResult {
        let result = catch_unwind(AssertUnwindSafe(|| self.execute(cmd)))
            .unwrap_or_else(|payload| Err(Error::Internal {
                reason: panic_message(payload.as_ref()),
            }));
        OperationResult::from(result)
    }

    /// Parse a JSON command and run it.
    pub fn run_json(&self, body: &str) -> OperationResult {
        match serde_json::from_str::<Command>(body) {
            Ok(cmd) => self.run(cmd),
            Err(e) => OperationResult::err(&Error::Serialization {
                reason: format!("invalid command: {}", e),
            }),
        }
    }

    fn dispatch(&self, cmd: Command) -> Result<Output> {
        let gw = &self.gateway;
        let config = &self.config;
        match cmd {
            // Server
            Command::Connect { uri } => server::connect(gw, &uri),
            Command::ListDatabases { uri } => server::list_databases(gw, &uri),

            // Database
            Command::ListCollections { uri, database } => {
                database::list_collections(gw, &uri, &database)
            }
            Command::NewDatabase {
                uri,
                database,
                collection,
            } => database::new_database(gw, &uri, &database, collection.as_deref()),
            Command::DropDatabase { uri, database } => {
                database::drop_database(gw, &uri, &database)
            }

            // Collection
            Command::CollectionInfo {
                uri,
                database,
                collection,
                page,
            } => collection::collection_info(gw, config, &uri, &database, &collection, page),
            Command::FindDocuments {
                uri,
                database,
                collection,
                field,
                value,
                value_type,
                page,
            } => collection::find_documents(
                gw,
                config,
                &uri,
                &database,
                &collection,
                FindArgs {
                    field: field.as_deref(),
                    value: value.as_deref(),
                    value_type,
                },
                page,
            ),
            Command::NewCollection {
                uri,
                database,
                collection,
            } => collection::new_collection(gw, &uri, &database, &collection),
            Command::DropCollection {
                uri,
                database,
                collection,
            } => collection::drop_collection(gw, &uri, &database, &collection),

            // Document
            Command::GetDocument {
                uri,
                database,
                collection,
                id,
            } => document::get_document(gw, config, &uri, &database, &collection, &id),
            Command::UpdateDocument {
                uri,
                database,
                collection,
                document: text,
            } => document::update_document(gw, &uri, &database, &collection, &text),
            Command::DeleteDocument {
                uri,
                database,
                collection,
                id,
            } => document::delete_document(gw, &uri, &database, &collection, id.as_deref()),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "operation panicked".to_string()
    }
}
