//! Executor configuration via `docdesk.toml`
//!
//! Every field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use docdesk_engine::{CountMode, PageOrder, QueryOptions};

use crate::{Error, Result};

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "docdesk.toml";

/// Largest accepted `document_indent`.
pub const MAX_DOCUMENT_INDENT: usize = 16;

/// Executor configuration loaded from `docdesk.toml`.
///
/// # Example
///
/// ```toml
/// document_indent = 4
/// max_page_size = 1000
/// estimate_unfiltered_counts = false
/// sort_pages_by_id = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeskConfig {
    /// Spaces per nesting level in `GetDocument` text (0 = single line).
    #[serde(default = "default_document_indent")]
    pub document_indent: usize,
    /// Largest accepted page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Let unfiltered totals use the collection's metadata count.
    #[serde(default)]
    pub estimate_unfiltered_counts: bool,
    /// Sort pages ascending by `_id` instead of natural order.
    #[serde(default)]
    pub sort_pages_by_id: bool,
}

fn default_document_indent() -> usize {
    4
}

fn default_max_page_size() -> u64 {
    1000
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            document_indent: default_document_indent(),
            max_page_size: default_max_page_size(),
            estimate_unfiltered_counts: false,
            sort_pages_by_id: false,
        }
    }
}

impl DeskConfig {
    /// Query knobs derived from this config.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            order: self.page_order(),
            count_mode: if self.estimate_unfiltered_counts {
                CountMode::AllowEstimate
            } else {
                CountMode::Exact
            },
        }
    }

    /// Page order derived from this config.
    pub fn page_order(&self) -> PageOrder {
        if self.sort_pages_by_id {
            PageOrder::ById
        } else {
            PageOrder::Natural
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# docdesk configuration
#
# Spaces per nesting level when a document is rendered for editing.
# 0 renders the whole document on one line. At most 16.
document_indent = 4

# Largest page size a request may ask for.
max_page_size = 1000

# Let unfiltered totals use the collection's metadata count instead of
# counting documents. Faster on large collections, may lag behind writes.
estimate_unfiltered_counts = false

# Sort pages ascending by _id. The default (false) uses the server's
# natural order.
sort_pages_by_id = false
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DeskConfig = toml::from_str(content).map_err(|e| Error::InvalidInput {
            reason: format!("Failed to parse config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidInput { reason } => Error::InvalidInput {
                reason: format!("{} ({})", reason, path.display()),
            },
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| Error::Io {
                reason: format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ),
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Serialization {
            reason: format!("Failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| Error::Io {
            reason: format!("Failed to write config file '{}': {}", path.display(), e),
        })
    }

    fn validate(&self) -> Result<()> {
        if self.document_indent > MAX_DOCUMENT_INDENT {
            return Err(Error::InvalidInput {
                reason: format!(
                    "document_indent must be at most {} (got {})",
                    MAX_DOCUMENT_INDENT, self.document_indent
                ),
            });
        }
        if self.max_page_size == 0 {
            return Err(Error::InvalidInput {
                reason: "max_page_size must be at least 1".into(),
            });
        }
        Ok(())
    }
}
