//! One executor shared across threads.

use std::sync::Arc;
use std::thread;

use crate::common::*;
use docdesk::{Command, PageRequest};

#[test]
fn concurrent_operations_share_one_executor() {
    let (executor, server) = create_executor();
    let executor = Arc::new(executor);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let executor = Arc::clone(&executor);
            thread::spawn(move || {
                for i in 0..25 {
                    let hex = format!("{:024x}", t * 1000 + i);
                    let result = executor.run(Command::UpdateDocument {
                        uri: URI.into(),
                        database: "shop".into(),
                        collection: "users".into(),
                        document: format!("{{_id: IDENT({}), thread: {}, i: {}}}", hex, t, i),
                    });
                    assert!(result.success, "{:?}", result.error_message);
                    assert!(executor
                        .run(find_users(None, None, None, PageRequest::new(0, 5)))
                        .success);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(server.documents("shop", "users").len(), 200);
    assert_eq!(server.open_connections(), 0);
    assert_eq!(server.opened_total(), 400);
}
