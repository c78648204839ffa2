//! Portable script export documents.
//!
//! ```json
//! { "version": 1, "type": "behavior-script", "code": "...", "exportedAt": "2026-..." }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repository::{RepositoryError, Result};

pub const EXPORT_VERSION: u32 = 1;

/// Type marker every export document must carry.
pub const EXPORT_TYPE: &str = "behavior-script";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptExport {
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
    pub exported_at: DateTime<Utc>,
}

impl ScriptExport {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            version: EXPORT_VERSION,
            kind: EXPORT_TYPE.to_owned(),
            code: code.into(),
            exported_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Extracts the script from an export document.
    ///
    /// Only the type marker and a string `code` are required; other fields
    /// are not checked.
    pub fn parse_code(json: &str) -> Result<String> {
        let document: Value = serde_json::from_str(json)?;
        if document.get("type").and_then(Value::as_str) != Some(EXPORT_TYPE) {
            return Err(RepositoryError::CorruptedData(format!(
                "export document is not of type {EXPORT_TYPE:?}"
            )));
        }
        match document.get("code") {
            Some(Value::String(code)) => Ok(code.clone()),
            _ => Err(RepositoryError::CorruptedData(
                "export document has no string `code`".to_owned(),
            )),
        }
    }
}

/// The script inside `json`, or `None` for anything that is not a valid
/// export document.
pub fn import_script(json: &str) -> Option<String> {
    match ScriptExport::parse_code(json) {
        Ok(code) => Some(code),
        Err(err) => {
            tracing::warn!(error = %err, "rejected script import");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_document_has_the_documented_shape() {
        let json = ScriptExport::new("function decide() {}").to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["type"], "behavior-script");
        assert_eq!(value["code"], "function decide() {}");
        assert!(value["exportedAt"].is_string());
        assert_eq!(import_script(&json).as_deref(), Some("function decide() {}"));
    }

    #[test]
    fn import_rejects_wrong_marker_or_code() {
        assert_eq!(import_script(r#"{"type":"other","code":"x"}"#), None);
        assert_eq!(import_script(r#"{"type":"behavior-script","code":42}"#), None);
        assert_eq!(import_script(r#"{"type":"behavior-script"}"#), None);
        assert_eq!(import_script("not json"), None);
        assert_eq!(
            import_script(r#"{"type":"behavior-script","code":""}"#).as_deref(),
            Some("")
        );
    }
}
