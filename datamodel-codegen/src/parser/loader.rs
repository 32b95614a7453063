//! Schema and meta document loading
//!
//! Documents are decoded into a plain nested [`serde_json::Value`] with key
//! order preserved, whatever their on-disk format.

use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::{CodegenError, Result};

/// On-disk document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("toml") => Ok(DocumentFormat::Toml),
            _ => Err(CodegenError::ParseError(format!(
                "Unsupported document format for {} (expected .json or .toml)",
                path.display()
            ))),
        }
    }
}

/// Read and decode a document file
pub fn load_document(path: &Path) -> Result<Value> {
    let format = DocumentFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| {
        CodegenError::ParseError(format!("Cannot read {}: {}", path.display(), e))
    })?;

    debug!("Loaded {} ({} bytes)", path.display(), content.len());
    parse_document(&content, format)
}

/// Decode document text
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(content)?),
        DocumentFormat::Toml => {
            let value: toml::Value = toml::from_str(content)?;
            Ok(serde_json::to_value(value)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("db/schema.JSON")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("meta.toml")).unwrap(),
            DocumentFormat::Toml
        );
        assert!(DocumentFormat::from_path(&PathBuf::from("schema.neon")).is_err());
    }

    #[test]
    fn test_json_keeps_key_order() {
        let value = parse_document(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#, DocumentFormat::Json)
            .unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_toml_document() {
        let value = parse_document(
            r#"
            databaseTable = "users"
            databaseTableId = "id"

            [databaseCols.rw.id]
            type = "int"
            "#,
            DocumentFormat::Toml,
        )
        .unwrap();

        assert_eq!(value["databaseTable"], "users");
        assert_eq!(value["databaseCols"]["rw"]["id"]["type"], "int");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            parse_document("{not json", DocumentFormat::Json),
            Err(CodegenError::ParseError(_))
        ));
    }
}
