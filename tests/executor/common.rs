//! Common test utilities for executor tests

use std::sync::Arc;

use docdesk::{
    Command, Document, DocumentValue, Executor, MemoryConnector, MemoryServer, Output,
    PageRequest, ValueType,
};

pub const URI: &str = "memory://local";

/// Create an executor over a fresh in-memory server named `local`
pub fn create_executor() -> (Executor, Arc<MemoryServer>) {
    let connector = MemoryConnector::new();
    let server = connector.add_server("local");
    (Executor::new(Arc::new(connector)), server)
}

/// Build a document from field/value pairs
pub fn doc(fields: &[(&str, DocumentValue)]) -> Document {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// FindDocuments on shop.users
pub fn find_users(
    field: Option<&str>,
    value: Option<&str>,
    value_type: Option<ValueType>,
    page: PageRequest,
) -> Command {
    Command::FindDocuments {
        uri: URI.into(),
        database: "shop".into(),
        collection: "users".into(),
        field: field.map(String::from),
        value: value.map(String::from),
        value_type,
        page,
    }
}

/// Extract (total, documents) from Output::DocumentPage
pub fn extract_page(output: Output) -> (u64, Vec<DocumentValue>) {
    match output {
        Output::DocumentPage {
            documents_total_count,
            documents,
            ..
        } => (documents_total_count, documents),
        other => panic!("Expected Output::DocumentPage, got {:?}", other),
    }
}

/// The `_id` of a document returned in a page
pub fn id_of(value: &DocumentValue) -> DocumentValue {
    match value {
        DocumentValue::Object(doc) => doc.get("_id").cloned().unwrap_or(DocumentValue::Null),
        other => panic!("Expected a document, got {:?}", other),
    }
}
