//! Database column type to scalar category mapping

use tracing::warn;

use crate::error::{CodegenError, Result};
use crate::parser::ScalarType;

/// Map a database type keyword to its scalar category.
///
/// The keyword is matched case-insensitively with any length/precision
/// suffix and `unsigned`/`zerofill` attributes removed, so `VARCHAR(255)`
/// and `int(10) unsigned` resolve like `varchar` and `int`.
pub fn map_column_type(raw_type_name: &str) -> Result<ScalarType> {
    let keyword = base_keyword(raw_type_name);

    let scalar = match keyword.as_str() {
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" | "year" => {
            ScalarType::Int
        }
        "float" | "double" | "real" | "decimal" | "numeric" => ScalarType::Float,
        "bool" | "boolean" | "bit" => ScalarType::Bool,
        "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" | "binary"
        | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" | "enum" | "set"
        | "time" | "uuid" => ScalarType::String,
        "json" => ScalarType::Json,
        "date" | "datetime" | "timestamp" => ScalarType::DateTime,
        _ => return Err(CodegenError::UnsupportedDataType(raw_type_name.to_string())),
    };

    Ok(scalar)
}

/// Map a column type, falling back to `string` for unknown keywords.
pub fn resolve_column_type(raw_type_name: &str) -> ScalarType {
    match map_column_type(raw_type_name) {
        Ok(scalar) => scalar,
        Err(err) => {
            warn!("{}; treating column as string", err);
            ScalarType::String
        }
    }
}

/// Strip modifiers from a type declaration, leaving the lowercase keyword
fn base_keyword(raw_type_name: &str) -> String {
    let lower = raw_type_name.trim().to_lowercase();
    let without_args = match lower.find('(') {
        Some(idx) => &lower[..idx],
        None => lower.as_str(),
    };

    without_args
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}
