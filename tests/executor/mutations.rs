//! Deletes, drops and namespace creation.

use crate::common::*;
use docdesk::{Command, DocumentValue, Output};

fn delete_all() -> Command {
    Command::DeleteDocument {
        uri: URI.into(),
        database: "shop".into(),
        collection: "users".into(),
        id: None,
    }
}

#[test]
fn delete_all_twice_leaves_an_empty_collection() {
    let (executor, server) = create_executor();
    for i in 0..4 {
        server.insert("shop", "users", doc(&[("n", DocumentValue::Int(i))]));
    }
    server.insert("shop", "orders", doc(&[("n", DocumentValue::Int(0))]));

    for _ in 0..2 {
        assert_eq!(executor.execute(delete_all()).unwrap(), Output::Unit);
        assert!(server.documents("shop", "users").is_empty());
    }
    assert_eq!(server.documents("shop", "orders").len(), 1);
}

#[test]
fn delete_one_removes_only_that_document() {
    let (executor, server) = create_executor();
    let keep = server.insert("shop", "users", doc(&[("name", "Ann".into())]));
    let gone = server.insert("shop", "users", doc(&[("name", "Bob".into())]));

    executor
        .execute(Command::DeleteDocument {
            uri: URI.into(),
            database: "shop".into(),
            collection: "users".into(),
            id: Some(gone.as_identifier().unwrap().to_hex()),
        })
        .unwrap();
    let docs = server.documents("shop", "users");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["_id"], keep);
}

#[test]
fn duplicate_collection_passes_the_driver_message_through() {
    let (executor, _server) = create_executor();
    let create = || Command::NewCollection {
        uri: URI.into(),
        database: "shop".into(),
        collection: "users".into(),
    };
    assert!(executor.run(create()).success);

    let result = executor.run(create());
    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("DriverFailure"));
    assert_eq!(
        result.error_message.as_deref(),
        Some("Collection shop.users already exists.")
    );
}

#[test]
fn dropping_missing_namespaces_succeeds() {
    let (executor, _server) = create_executor();
    assert!(executor
        .run(Command::DropCollection {
            uri: URI.into(),
            database: "nowhere".into(),
            collection: "nothing".into(),
        })
        .success);
    assert!(executor
        .run(Command::DropDatabase {
            uri: URI.into(),
            database: "nowhere".into(),
        })
        .success);
}

#[test]
fn update_inserts_when_the_id_is_new() {
    let (executor, server) = create_executor();
    executor
        .execute(Command::UpdateDocument {
            uri: URI.into(),
            database: "shop".into(),
            collection: "users".into(),
            document: r#"{"_id": "custom-key", "joined": DATE(2023-05-06T07:08:09.123Z)}"#.into(),
        })
        .unwrap();
    let docs = server.documents("shop", "users");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["_id"], DocumentValue::Str("custom-key".into()));
    assert!(matches!(docs[0]["joined"], DocumentValue::Date(_)));
}
