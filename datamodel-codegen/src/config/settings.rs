//! Configuration settings for datamodel-codegen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::defaults;
use crate::codegen::{ArtifactKind, KeyStyle};
use crate::error::{CodegenError, Result};
use crate::mapper::TypeDecl;

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the schema document (JSON or TOML)
    #[serde(default)]
    pub schema_file: PathBuf,

    /// Optional per-table, per-column options overlay
    #[serde(default)]
    pub meta_file: Option<PathBuf>,

    /// Base directory for generated files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Namespace prefix of generated classes
    #[serde(default = "default_base_namespace")]
    pub base_namespace: String,

    /// Namespace prefix stripped when deriving file paths
    #[serde(default = "default_ignored_namespace")]
    pub ignored_namespace: String,

    /// Generate only this table (all tables when unset)
    #[serde(default)]
    pub table: Option<String>,

    /// Artifact kinds to generate (collection, data, llstorage)
    #[serde(default = "default_artifacts")]
    pub artifacts: Vec<String>,

    /// Key style expected by the generated `fromArray` method
    #[serde(default)]
    pub array_key_style: KeyStyle,

    /// PHP date format used to serialize datetime columns
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,

    /// Dry run mode - report what would be written without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Overwrite files that already exist
    #[serde(default = "default_force")]
    pub force: bool,

    /// Print generated files (or a diff against existing ones) to stdout
    #[serde(default = "default_print")]
    pub print: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,

    /// Runtime library classes the generated code builds on
    #[serde(default)]
    pub runtime: RuntimeClasses,

    /// Extra value-object types registered in the type catalog
    #[serde(default)]
    pub value_objects: Vec<TypeDecl>,
}

/// Fully-qualified names of the runtime library classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeClasses {
    #[serde(default = "default_data_interface")]
    pub data_interface: String,

    #[serde(default = "default_collection_base")]
    pub collection_base: String,

    #[serde(default = "default_collection_interface")]
    pub collection_interface: String,

    #[serde(default = "default_storage_base")]
    pub storage_base: String,
}

// Default value functions for serde
fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}
fn default_base_namespace() -> String {
    defaults::BASE_NAMESPACE.to_string()
}
fn default_ignored_namespace() -> String {
    defaults::IGNORED_NAMESPACE.to_string()
}
fn default_artifacts() -> Vec<String> {
    defaults::ARTIFACTS.iter().map(|s| s.to_string()).collect()
}
fn default_datetime_format() -> String {
    defaults::DATETIME_FORMAT.to_string()
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}
fn default_force() -> bool {
    defaults::FORCE
}
fn default_print() -> bool {
    defaults::PRINT
}
fn default_data_interface() -> String {
    defaults::DATA_INTERFACE.to_string()
}
fn default_collection_base() -> String {
    defaults::COLLECTION_BASE.to_string()
}
fn default_collection_interface() -> String {
    defaults::COLLECTION_INTERFACE.to_string()
}
fn default_storage_base() -> String {
    defaults::STORAGE_BASE.to_string()
}

impl Default for RuntimeClasses {
    fn default() -> Self {
        Self {
            data_interface: default_data_interface(),
            collection_base: default_collection_base(),
            collection_interface: default_collection_interface(),
            storage_base: default_storage_base(),
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::new(),
            meta_file: None,
            output_dir: default_output_dir(),
            base_namespace: default_base_namespace(),
            ignored_namespace: default_ignored_namespace(),
            table: None,
            artifacts: default_artifacts(),
            array_key_style: KeyStyle::default(),
            datetime_format: default_datetime_format(),
            dry_run: default_dry_run(),
            force: default_force(),
            print: default_print(),
            log_level: None,
            runtime: RuntimeClasses::default(),
            value_objects: Vec::new(),
        }
    }
}

impl CodegenConfig {
    /// Create a default config with the given schema file
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            // Try default locations
            builder = builder.add_source(File::with_name("datamodel-codegen").required(false));
        }

        // Override with environment variables (DATAMODEL_CODEGEN__*)
        builder = builder.add_source(
            Environment::with_prefix("DATAMODEL_CODEGEN")
                .prefix_separator("__")
                .try_parsing(true),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Requested artifact kinds, in request order.
    ///
    /// Unknown names are reported and skipped; duplicates are dropped.
    pub fn artifact_kinds(&self) -> Vec<ArtifactKind> {
        let mut kinds = Vec::new();
        for name in &self.artifacts {
            match name.parse::<ArtifactKind>() {
                Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Ok(_) => {}
                Err(_) => warn!("Generator {} is not allowed. Skipping.", name),
            }
        }
        kinds
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema_file.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "schema_file is required".into(),
            ));
        }

        if !self.schema_file.exists() {
            return Err(CodegenError::ValidationError(format!(
                "Schema file not found: {}",
                self.schema_file.display()
            )));
        }

        if self.base_namespace.trim_matches('\\').is_empty() {
            return Err(CodegenError::ValidationError(
                "base_namespace must not be empty".into(),
            ));
        }

        if self.artifact_kinds().is_empty() {
            return Err(CodegenError::ValidationError(format!(
                "at least one artifact kind is required ({})",
                defaults::ARTIFACTS.join(", ")
            )));
        }

        Ok(())
    }
}
