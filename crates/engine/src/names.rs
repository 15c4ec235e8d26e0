//! Database and collection naming rules
//!
//! Names are checked before any round-trip so a bad name never reaches the
//! server. The rules follow MongoDB's:
//!
//! | Kind | Rule |
//! |------|------|
//! | database | non-empty, under 64 bytes, none of `/\. "$*<>:\|?` or NUL |
//! | collection | non-empty, at most 255 bytes, no `$` or NUL, not `system.*` |

use docdesk_core::{Error, Result};

/// Longest database name, exclusive
pub const MAX_DATABASE_NAME_BYTES: usize = 64;

/// Longest collection name, inclusive
pub const MAX_COLLECTION_NAME_BYTES: usize = 255;

const DATABASE_FORBIDDEN: &[char] = &['/', '\\', '.', ' ', '"', '$', '*', '<', '>', ':', '|', '?', '\0'];

/// Check a database name
pub fn validate_database_name(name: &str) -> Result<()> {
    let reject = |reason: String| Error::InvalidName {
        kind: "database",
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(reject("name is empty".into()));
    }
    if name.len() >= MAX_DATABASE_NAME_BYTES {
        return Err(reject(format!(
            "name must be shorter than {} bytes",
            MAX_DATABASE_NAME_BYTES
        )));
    }
    if let Some(c) = name.chars().find(|c| DATABASE_FORBIDDEN.contains(c)) {
        return Err(reject(format!("character {:?} is not allowed", c)));
    }
    Ok(())
}

/// Check a collection name
pub fn validate_collection_name(name: &str) -> Result<()> {
    let reject = |reason: String| Error::InvalidName {
        kind: "collection",
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(reject("name is empty".into()));
    }
    if name.len() > MAX_COLLECTION_NAME_BYTES {
        return Err(reject(format!(
            "name must be at most {} bytes",
            MAX_COLLECTION_NAME_BYTES
        )));
    }
    if let Some(c) = name.chars().find(|c| matches!(c, '$' | '\0')) {
        return Err(reject(format!("character {:?} is not allowed", c)));
    }
    if name.starts_with("system.") {
        return Err(reject("the system. prefix is reserved".into()));
    }
    Ok(())
}
