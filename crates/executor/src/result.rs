//! Result envelope returned at the operation boundary.
//!
//! ```json
//! {"success": true, "payload": {"DocumentText": "{...}"}}
//! {"success": false, "errorMessage": "connection failure: ...", "errorKind": "ConnectionFailure"}
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Output, Result};

/// Outcome of one operation, ready to hand to a UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    /// True when the operation completed
    pub success: bool,
    /// Result data on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Output>,
    /// Human-readable message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// [`Error::kind`] on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl OperationResult {
    /// A successful result
    pub fn ok(payload: Output) -> Self {
        OperationResult {
            success: true,
            payload: Some(payload),
            error_message: None,
            error_kind: None,
        }
    }

    /// A failed result
    pub fn err(error: &Error) -> Self {
        OperationResult {
            success: false,
            payload: None,
            error_message: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
        }
    }

    /// True when the failure means the connection string should be re-entered
    pub fn needs_reconnect(&self) -> bool {
        self.error_kind.as_deref() == Some("ConnectionFailure")
    }

    /// Render as JSON, pretty-printed unless `compact`
    pub fn to_json(&self, compact: bool) -> String {
        let rendered = if compact {
            serde_json::to_string(self)
        } else {
            serde_json::to_string_pretty(self)
        };
        rendered.unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"errorMessage":"failed to serialize result: {}","errorKind":"Serialization"}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }
}

impl From<Result<Output>> for OperationResult {
    fn from(result: Result<Output>) -> Self {
        match result {
            Ok(output) => OperationResult::ok(output),
            Err(e) => OperationResult::err(&e),
        }
    }
}
