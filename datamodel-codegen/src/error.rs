//! Error types for datamodel-codegen

use thiserror::Error;

/// Result type alias for datamodel-codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Failed to parse schema: {0}")]
    ParseError(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Table with name {table} does not exist in provided schema {schema}")]
    TableNotFound { table: String, schema: String },

    #[error("No tables could be generated from the provided schema")]
    NoTables,

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),
}

impl From<serde_json::Error> for CodegenError {
    fn from(err: serde_json::Error) -> Self {
        CodegenError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for CodegenError {
    fn from(err: toml::de::Error) -> Self {
        CodegenError::ParseError(err.to_string())
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}

/// Reasons a value-object type cannot be used as a column mapping.
///
/// These never abort a run: the column falls back to its raw scalar type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Class {class} doesn't have method {method}")]
    MissingMethod { class: String, method: String },

    #[error("Invoked method {method} of class {class} is not public")]
    NotPublic { class: String, method: String },

    #[error("Method {method} of class {class} has more than one required parameter ({required})")]
    TooManyParameters {
        class: String,
        method: String,
        required: usize,
    },
}
