//! End-to-end scenarios through the executor.

use crate::common::*;
use docdesk::{decode, Command, DocumentValue, ObjectId, Output, PageRequest, ValueType};

const HEX: &str = "507f191e810c19729de860ea";

fn ann() -> DocumentValue {
    DocumentValue::Object(doc(&[
        ("_id", DocumentValue::Identifier(ObjectId::parse_hex(HEX).unwrap())),
        ("name", DocumentValue::Str("Ann".into())),
    ]))
}

fn create_ann(executor: &docdesk::Executor) {
    executor
        .execute(Command::NewCollection {
            uri: URI.into(),
            database: "shop".into(),
            collection: "users".into(),
        })
        .unwrap();
    executor
        .execute(Command::UpdateDocument {
            uri: URI.into(),
            database: "shop".into(),
            collection: "users".into(),
            document: format!(r#"{{_id: IDENT({}), name: "Ann"}}"#, HEX),
        })
        .unwrap();
}

#[test]
fn created_document_reads_back_as_equal_text() {
    let (executor, _server) = create_executor();
    create_ann(&executor);

    let output = executor
        .execute(Command::GetDocument {
            uri: URI.into(),
            database: "shop".into(),
            collection: "users".into(),
            id: HEX.into(),
        })
        .unwrap();
    let text = match output {
        Output::DocumentText(Some(text)) => text,
        other => panic!("Expected document text, got {:?}", other),
    };
    assert_eq!(decode(&text).unwrap(), ann());
}

#[test]
fn find_by_name_returns_the_single_match() {
    let (executor, _server) = create_executor();
    create_ann(&executor);

    let (total, documents) = extract_page(
        executor
            .execute(find_users(
                Some("name"),
                Some("Ann"),
                Some(ValueType::String),
                PageRequest::default(),
            ))
            .unwrap(),
    );
    assert_eq!(total, 1);
    assert_eq!(documents, vec![ann()]);
}

#[test]
fn deleting_a_missing_document_succeeds() {
    let (executor, server) = create_executor();
    create_ann(&executor);

    let result = executor.run(Command::DeleteDocument {
        uri: URI.into(),
        database: "shop".into(),
        collection: "users".into(),
        id: Some("000000000000000000000000".into()),
    });
    assert!(result.success);
    assert_eq!(server.documents("shop", "users").len(), 1);
}

#[test]
fn new_then_drop_database_leaves_listing_unchanged() {
    let (executor, server) = create_executor();
    server.insert("shop", "users", doc(&[("name", "Ann".into())]));
    let list = || executor.execute(Command::ListDatabases { uri: URI.into() }).unwrap();
    let before = list();

    for collection in [None, Some("first".to_string())] {
        executor
            .execute(Command::NewDatabase {
                uri: URI.into(),
                database: "scratch".into(),
                collection,
            })
            .unwrap();
        executor
            .execute(Command::DropDatabase {
                uri: URI.into(),
                database: "scratch".into(),
            })
            .unwrap();
        assert_eq!(list(), before);
    }
}

#[test]
fn edit_cycle_preserves_types() {
    let (executor, server) = create_executor();
    let id = server.insert(
        "shop",
        "users",
        doc(&[
            ("name", "Ann".into()),
            ("age", DocumentValue::Int(30)),
            ("score", DocumentValue::Float(1.5)),
        ]),
    );
    let hex = id.as_identifier().unwrap().to_hex();
    let get = || match executor
        .execute(Command::GetDocument {
            uri: URI.into(),
            database: "shop".into(),
            collection: "users".into(),
            id: hex.clone(),
        })
        .unwrap()
    {
        Output::DocumentText(Some(text)) => text,
        other => panic!("Expected document text, got {:?}", other),
    };

    // Saving the text unchanged is a no-op
    let text = get();
    executor
        .execute(Command::UpdateDocument {
            uri: URI.into(),
            database: "shop".into(),
            collection: "users".into(),
            document: text.clone(),
        })
        .unwrap();
    assert_eq!(get(), text);

    let edited = text.replace("\"age\": 30", "\"age\": 31");
    executor
        .execute(Command::UpdateDocument {
            uri: URI.into(),
            database: "shop".into(),
            collection: "users".into(),
            document: edited,
        })
        .unwrap();
    let docs = server.documents("shop", "users");
    assert_eq!(docs[0]["age"], DocumentValue::Int(31));
    assert_eq!(docs[0]["score"], DocumentValue::Float(1.5));
}
