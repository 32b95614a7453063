//! Per-column generation options
//!
//! Options come either from a meta overlay document (table -> column ->
//! options) or, when no overlay is supplied, from the column comment. A
//! comment is read as a JSON object of option keys or as a bare
//! fully-qualified type name starting with `\`.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

use crate::error::{CodegenError, Result};

/// Recognized option keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    /// Value-object class wrapping the column
    TypeClass,
    /// Column is set only during hydration
    ReadOnly,
}

impl FromStr for OptionKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "typeClass" => Ok(OptionKey::TypeClass),
            "readOnly" | "readonly" => Ok(OptionKey::ReadOnly),
            other => Err(format!("Invalid meta name \"{}\"", other)),
        }
    }
}

/// Options resolved for one column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOptions {
    pub type_class: Option<String>,
    pub read_only: bool,
}

impl ColumnOptions {
    /// Build options from a key/value map, warning about unknown keys
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut options = Self::default();

        for (key, value) in map {
            match key.parse::<OptionKey>() {
                Ok(OptionKey::TypeClass) => options.type_class = type_class_value(value),
                Ok(OptionKey::ReadOnly) => options.read_only = parse_flag(value),
                Err(msg) => warn!("{}. Ignoring.", msg),
            }
        }

        options
    }

    /// Parse options out of a free-text column comment
    pub fn from_comment(comment: &str) -> Self {
        let comment = comment.trim();
        if comment.is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<Value>(comment) {
            Ok(Value::Object(map)) => return Self::from_map(&map),
            Ok(_) => {
                warn!("Column comment {:?} is not an options object. Ignoring.", comment);
                return Self::default();
            }
            Err(err) if comment.starts_with('{') => {
                warn!("Malformed options in column comment {:?}: {}", comment, err);
                return Self::default();
            }
            Err(_) => {}
        }

        if comment.len() > 1 && comment.starts_with('\\') {
            return Self {
                type_class: Some(comment.to_string()),
                read_only: false,
            };
        }

        warn!(
            "Column comment {:?} is neither an options object nor a type name. Ignoring.",
            comment
        );
        Self::default()
    }
}

fn type_class_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Null => None,
        other => {
            warn!("Invalid type class {}. Ignoring.", other);
            None
        }
    }
}

/// Interpret a loosely-typed boolean flag.
///
/// `true`, non-zero numbers and the strings `1/true/on/yes` (any case) are
/// true; everything else is false.
pub fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => parse_flag_str(s),
        _ => false,
    }
}

/// String form of [`parse_flag`]
pub fn parse_flag_str(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

/// Explicit per-table, per-column options
#[derive(Debug, Clone, Default)]
pub struct MetaOverlay {
    tables: HashMap<String, HashMap<String, ColumnOptions>>,
}

impl MetaOverlay {
    /// Build the overlay from a decoded document
    pub fn from_value(value: &Value) -> Result<Self> {
        let tables = value.as_object().ok_or_else(|| {
            CodegenError::InvalidSchema("meta document must map table names to columns".into())
        })?;

        let mut overlay = Self::default();
        for (table_name, columns) in tables {
            let mut table_meta = HashMap::new();

            match columns {
                Value::Object(columns) => {
                    for (column_name, column_meta) in columns {
                        let options = match column_meta {
                            Value::Object(map) => ColumnOptions::from_map(map),
                            Value::Null => ColumnOptions::default(),
                            other => {
                                warn!(
                                    "Meta for column {}.{} is not a mapping ({}). Ignoring.",
                                    table_name, column_name, other
                                );
                                ColumnOptions::default()
                            }
                        };
                        table_meta.insert(column_name.clone(), options);
                    }
                }
                Value::Null => {}
                other => warn!(
                    "Meta for table {} is not a mapping ({}). Ignoring.",
                    table_name, other
                ),
            }

            overlay.tables.insert(table_name.clone(), table_meta);
        }

        Ok(overlay)
    }

    /// Options for a column, defaults when not listed
    pub fn column(&self, table: &str, column: &str) -> ColumnOptions {
        self.tables
            .get(table)
            .and_then(|columns| columns.get(column))
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comment_json_options() {
        let options =
            ColumnOptions::from_comment(r#"{"typeClass": "\\App\\Enum\\Status", "readOnly": "yes"}"#);
        assert_eq!(options.type_class.as_deref(), Some("\\App\\Enum\\Status"));
        assert!(options.read_only);
    }

    #[test]
    fn test_comment_type_name() {
        let options = ColumnOptions::from_comment("\\Ramsey\\Uuid\\UuidInterface");
        assert_eq!(
            options.type_class.as_deref(),
            Some("\\Ramsey\\Uuid\\UuidInterface")
        );
        assert!(!options.read_only);
    }

    #[test]
    fn test_malformed_comment_keeps_defaults() {
        assert_eq!(
            ColumnOptions::from_comment(r#"{"typeClass": "\\App\\X", "readOnly": tru"#),
            ColumnOptions::default()
        );
        assert_eq!(ColumnOptions::from_comment("User e-mail"), ColumnOptions::default());
        assert_eq!(ColumnOptions::from_comment("\\"), ColumnOptions::default());
        assert_eq!(ColumnOptions::from_comment("42"), ColumnOptions::default());
        assert_eq!(ColumnOptions::from_comment("[1,"), ColumnOptions::default());
        assert_eq!(ColumnOptions::from_comment("[\"readOnly\"]"), ColumnOptions::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options = ColumnOptions::from_comment(r#"{"hidden": true, "readOnly": 1}"#);
        assert!(options.type_class.is_none());
        assert!(options.read_only);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(&json!(true)));
        assert!(parse_flag(&json!(1)));
        assert!(parse_flag(&json!("ON")));
        assert!(parse_flag(&json!(" yes ")));
        assert!(!parse_flag(&json!("no")));
        assert!(!parse_flag(&json!("maybe")));
        assert!(!parse_flag(&json!(0)));
        assert!(!parse_flag(&Value::Null));
    }

    #[test]
    fn test_meta_overlay_lookup() {
        let overlay = MetaOverlay::from_value(&json!({
            "users": {
                "id": {"typeClass": "Ramsey\\Uuid\\UuidInterface"},
                "created_at": {"readOnly": true},
                "email": null
            },
            "logs": null
        }))
        .unwrap();

        assert_eq!(
            overlay.column("users", "id").type_class.as_deref(),
            Some("Ramsey\\Uuid\\UuidInterface")
        );
        assert!(overlay.column("users", "created_at").read_only);
        assert_eq!(overlay.column("users", "email"), ColumnOptions::default());
        assert_eq!(overlay.column("logs", "id"), ColumnOptions::default());
        assert_eq!(overlay.column("missing", "id"), ColumnOptions::default());
    }

    #[test]
    fn test_meta_overlay_must_be_mapping() {
        assert!(MetaOverlay::from_value(&json!(["users"])).is_err());
    }
}
