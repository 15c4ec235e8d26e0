//! Page boundaries and totals.

use std::collections::HashSet;

use crate::common::*;
use docdesk::{Command, DeskConfig, DocumentValue, Executor, MemoryConnector, PageRequest};

fn seed(server: &docdesk::MemoryServer, n: i64) {
    for i in 0..n {
        server.insert("shop", "users", doc(&[("n", DocumentValue::Int(i))]));
    }
}

fn page_ids(executor: &Executor, index: u64, size: u64) -> (u64, Vec<DocumentValue>) {
    let (total, documents) = extract_page(
        executor
            .execute(find_users(None, None, None, PageRequest::new(index, size)))
            .unwrap(),
    );
    (total, documents.iter().map(id_of).collect())
}

#[test]
fn two_pages_split_without_overlap() {
    for (count, size) in [(0, 10), (7, 10), (10, 10), (13, 10), (25, 10), (5, 1)] {
        let (executor, server) = create_executor();
        seed(&server, count);

        let (total, first) = page_ids(&executor, 0, size);
        let (_, second) = page_ids(&executor, 1, size);
        let count = count as u64;
        assert_eq!(total, count);
        assert_eq!(first.len() as u64, size.min(count));
        assert_eq!(second.len() as u64, size.min(count.saturating_sub(size)));

        let mut seen = HashSet::new();
        for id in first.iter().chain(second.iter()) {
            assert!(seen.insert(format!("{:?}", id)), "id {:?} on both pages", id);
        }
    }
}

#[test]
fn page_past_the_end_is_empty() {
    let (executor, server) = create_executor();
    seed(&server, 3);
    let (total, ids) = page_ids(&executor, 5, 10);
    assert_eq!(total, 3);
    assert!(ids.is_empty());
}

#[test]
fn zero_page_size_is_invalid_input() {
    let (executor, _server) = create_executor();
    let result = executor.run(find_users(None, None, None, PageRequest::new(0, 0)));
    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("InvalidInput"));
}

#[test]
fn pages_sorted_by_id_when_configured() {
    let connector = MemoryConnector::new();
    let server = connector.add_server("local");
    let executor = Executor::with_config(
        std::sync::Arc::new(connector),
        DeskConfig {
            sort_pages_by_id: true,
            ..DeskConfig::default()
        },
    );
    // Inserted out of id order
    for hex in ["000000000000000000000003", "000000000000000000000001", "000000000000000000000002"] {
        executor
            .execute(Command::UpdateDocument {
                uri: URI.into(),
                database: "shop".into(),
                collection: "users".into(),
                document: format!("{{_id: IDENT({})}}", hex),
            })
            .unwrap();
    }
    assert_eq!(server.documents("shop", "users").len(), 3);

    let (_, ids) = page_ids(&executor, 0, 2);
    let hexes: Vec<String> = ids
        .iter()
        .map(|id| id.as_identifier().unwrap().to_hex())
        .collect();
    assert_eq!(hexes, ["000000000000000000000001", "000000000000000000000002"]);
}

#[test]
fn estimated_totals_match_exact_on_quiet_collections() {
    let connector = MemoryConnector::new();
    let server = connector.add_server("local");
    let executor = Executor::with_config(
        std::sync::Arc::new(connector),
        DeskConfig {
            estimate_unfiltered_counts: true,
            ..DeskConfig::default()
        },
    );
    seed(&server, 12);
    let (total, ids) = page_ids(&executor, 1, 10);
    assert_eq!(total, 12);
    assert_eq!(ids.len(), 2);
}
