//! Shared request and result types
//!
//! This module defines the structured values that flow between the engines
//! and the command layer:
//! - PageRequest: zero-based page index plus page size
//! - TargetLocator: database and optional collection
//! - DatabaseListing / DatabaseEntry: server-wide database list
//! - CollectionListing / CollectionEntry: collections of one database
//! - DocumentPage: one page of documents plus the filtered total

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::value::{Document, DocumentValue};

/// Default number of documents per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A zero-based page of results.
///
/// JSON bodies may use the field names `page` and `rowsPerPage` as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Zero-based page number
    #[serde(default, alias = "page")]
    pub page_index: u64,
    /// Documents per page (at least 1)
    #[serde(default = "default_page_size", alias = "rowsPerPage")]
    pub page_size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Create a page request
    pub fn new(page_index: u64, page_size: u64) -> Self {
        PageRequest {
            page_index,
            page_size,
        }
    }

    /// Check the request against a maximum page size
    pub fn validate(&self, max_page_size: u64) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_input("page size must be at least 1"));
        }
        if self.page_size > max_page_size {
            return Err(Error::invalid_input(format!(
                "page size {} exceeds the maximum of {}",
                self.page_size, max_page_size
            )));
        }
        self.skip().map(|_| ())
    }

    /// Number of documents before this page
    pub fn skip(&self) -> Result<u64> {
        self.page_index.checked_mul(self.page_size).ok_or_else(|| {
            Error::invalid_input(format!(
                "page {} of size {} is out of range",
                self.page_index, self.page_size
            ))
        })
    }
}

/// Where an operation applies: a database, optionally narrowed to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetLocator {
    /// Database name
    pub database: String,
    /// Collection name; absent for database-level operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl TargetLocator {
    /// Locate a database
    pub fn database(database: impl Into<String>) -> Self {
        TargetLocator {
            database: database.into(),
            collection: None,
        }
    }

    /// Locate a collection inside a database
    pub fn collection(database: impl Into<String>, collection: impl Into<String>) -> Self {
        TargetLocator {
            database: database.into(),
            collection: Some(collection.into()),
        }
    }
}

impl fmt::Display for TargetLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.collection {
            Some(coll) => write!(f, "{}.{}", self.database, coll),
            None => f.write_str(&self.database),
        }
    }
}

/// One database as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseEntry {
    /// Database name
    pub name: String,
    /// Bytes used on disk
    #[serde(default)]
    pub size_on_disk: u64,
    /// True when the database holds no data
    #[serde(default)]
    pub empty: bool,
}

/// All databases on the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseListing {
    /// Databases in server order
    pub databases: Vec<DatabaseEntry>,
    /// Sum of all sizes on disk
    #[serde(default)]
    pub total_size: u64,
}

/// One collection (or view) in a database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    /// Collection name
    pub name: String,
    /// `collection`, `view`, `timeseries`, or the server's raw type string
    #[serde(rename = "type", default = "default_collection_type")]
    pub collection_type: String,
}

fn default_collection_type() -> String {
    "collection".to_string()
}

impl CollectionEntry {
    /// A regular collection
    pub fn collection(name: impl Into<String>) -> Self {
        CollectionEntry {
            name: name.into(),
            collection_type: default_collection_type(),
        }
    }
}

/// Database statistics plus the collections it holds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionListing {
    /// Database statistics, passed through verbatim
    pub stats: Document,
    /// Collections in server order
    pub collections: Vec<CollectionEntry>,
}

/// One page of documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    /// Documents matching the filter across all pages
    pub total: u64,
    /// Documents on this page
    pub documents: Vec<DocumentValue>,
}
