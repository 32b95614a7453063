//! Naming utilities for code generation

use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Convert an identifier to camelCase (`created_at` -> `createdAt`)
pub fn to_camel_case(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Convert an identifier to PascalCase (`order_items` -> `OrderItems`)
pub fn to_pascal_case(name: &str) -> String {
    name.to_pascal_case()
}

/// Convert an identifier to snake_case (`createdAt` -> `created_at`)
pub fn to_snake_case(name: &str) -> String {
    name.to_snake_case()
}

/// Key naming convention expected in `fromArray` input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyStyle {
    /// Column name as stored
    #[serde(rename = "raw")]
    Raw,
    #[default]
    #[serde(rename = "camelCase")]
    CamelCase,
    #[serde(rename = "PascalCase")]
    PascalCase,
    #[serde(rename = "snake_case")]
    SnakeCase,
}

impl KeyStyle {
    /// Apply the convention to a column name
    pub fn apply(&self, column: &str) -> String {
        match self {
            KeyStyle::Raw => column.to_string(),
            KeyStyle::CamelCase => to_camel_case(column),
            KeyStyle::PascalCase => to_pascal_case(column),
            KeyStyle::SnakeCase => to_snake_case(column),
        }
    }
}

/// Join namespace segments with `\`, ignoring empty ones
pub fn join_namespace<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(|s| s.trim_matches('\\'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\\")
}

/// Last segment of a fully-qualified name
pub fn short_name(fqcn: &str) -> &str {
    let fqcn = fqcn.trim_start_matches('\\');
    fqcn.rsplit('\\').next().unwrap_or(fqcn)
}

/// Relative source path of a class: namespace segments as directories with
/// the `ignored` prefix removed when present, plus `.php`.
pub fn class_file_path(fqcn: &str, ignored: &str) -> PathBuf {
    let fqcn = fqcn.trim_start_matches('\\');
    let ignored = ignored.trim_matches('\\');

    let relative = if ignored.is_empty() {
        fqcn
    } else {
        match fqcn.strip_prefix(ignored) {
            Some(rest) if rest.starts_with('\\') => &rest[1..],
            _ => fqcn,
        }
    };

    let mut path: PathBuf = relative.split('\\').filter(|s| !s.is_empty()).collect();
    path.set_extension("php");
    path
}
