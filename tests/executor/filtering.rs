//! Filter value coercion through FindDocuments.

use crate::common::*;
use docdesk::{DocumentValue, PageRequest, ValueType};

fn seeded() -> (docdesk::Executor, std::sync::Arc<docdesk::MemoryServer>) {
    let (executor, server) = create_executor();
    server.insert(
        "shop",
        "users",
        doc(&[("name", "Ann".into()), ("age", DocumentValue::Int(30))]),
    );
    server.insert(
        "shop",
        "users",
        doc(&[("name", "Bob".into()), ("age", "30".into())]),
    );
    server.insert(
        "shop",
        "users",
        doc(&[("name", "Cy".into()), ("age", DocumentValue::Float(30.0))]),
    );
    (executor, server)
}

fn names(
    executor: &docdesk::Executor,
    field: &str,
    value: &str,
    value_type: Option<ValueType>,
) -> Vec<String> {
    let (_, documents) = extract_page(
        executor
            .execute(find_users(Some(field), Some(value), value_type, PageRequest::default()))
            .unwrap(),
    );
    documents
        .iter()
        .map(|d| match d {
            DocumentValue::Object(doc) => match &doc["name"] {
                DocumentValue::Str(s) => s.clone(),
                other => panic!("unexpected name {:?}", other),
            },
            other => panic!("unexpected document {:?}", other),
        })
        .collect()
}

#[test]
fn number_matches_numeric_values_only() {
    let (executor, _server) = seeded();
    assert_eq!(names(&executor, "age", "30", Some(ValueType::Number)), ["Ann", "Cy"]);
}

#[test]
fn string_matches_text_only() {
    let (executor, _server) = seeded();
    assert_eq!(names(&executor, "age", "30", Some(ValueType::String)), ["Bob"]);
}

#[test]
fn unspecified_type_reads_value_as_text() {
    let (executor, _server) = seeded();
    assert_eq!(names(&executor, "age", "30", None), ["Bob"]);
    assert_eq!(names(&executor, "age", "30", Some(ValueType::Unspecified)), ["Bob"]);
}

#[test]
fn identifier_matches_the_identified_document() {
    let (executor, server) = seeded();
    let id = server.insert("shop", "users", doc(&[("name", "Dee".into())]));
    let hex = id.as_identifier().unwrap().to_hex();

    assert_eq!(names(&executor, "_id", &hex, Some(ValueType::Identifier)), ["Dee"]);
    // The same hex as plain text matches nothing
    assert!(names(&executor, "_id", &hex, Some(ValueType::String)).is_empty());
}

#[test]
fn empty_field_returns_everything() {
    let (executor, _server) = seeded();
    let (total, documents) = extract_page(
        executor
            .execute(find_users(Some(""), None, None, PageRequest::default()))
            .unwrap(),
    );
    assert_eq!(total, 3);
    assert_eq!(documents.len(), 3);
}

#[test]
fn malformed_values_are_rejected_with_the_field_name() {
    let (executor, _server) = seeded();
    for (value, value_type) in [("3x", ValueType::Number), ("zz", ValueType::Identifier)] {
        let result = executor.run(find_users(
            Some("age"),
            Some(value),
            Some(value_type),
            PageRequest::default(),
        ));
        assert!(!result.success);
        assert_eq!(result.error_kind.as_deref(), Some("InvalidFilterValue"));
        assert!(result.error_message.unwrap().contains("age"));
    }
}
