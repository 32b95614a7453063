//! datamodel-codegen: Generate PHP database model classes from table schemas
//!
//! This crate provides both a CLI tool and a library for generating the
//! MondayFactory DatabaseModel classes of a relational schema. It reads a
//! schema document (information_schema dump or grouped-column schema, JSON or
//! TOML) and generates, per table:
//!
//! - A data class (`<Table>Data`) with typed accessors, `fromRow`,
//!   `fromArray`, `toArray` and `toDatabaseArray`
//! - A collection class (`<Table>Collection`)
//! - A low-level storage class (`<Table>DatabaseLowLevelStorage`)
//!
//! # Programmatic Configuration
//!
//! ```rust,ignore
//! fn main() {
//!     let report = datamodel_codegen::GeneratorBuilder::new("db/schema.json")
//!         .output_dir("app/model")
//!         .namespace("App\\Model")
//!         .ignored_namespace("App\\Model")
//!         .generate()
//!         .expect("Failed to generate model classes");
//!
//!     println!("{} files written", report.written());
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! datamodel-codegen --schema db/schema.json -o app/model users data llstorage
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod mapper;
pub mod output;
pub mod parser;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use codegen::{ArtifactKind, CodeGenerator, GeneratedFile, KeyStyle, RenderOptions};
use mapper::{TypeCatalog, ValueObjectMapper};
use output::{OutputOptions, OutputWriter, WriteOutcome};
use parser::{MetaOverlay, TableDefinition};

pub use config::CodegenConfig;
pub use error::{CodegenError, Result};

/// Table argument meaning "every table"
pub const ALL_TABLES: &str = "-";

/// Summary of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Tables that were rendered
    pub tables: Vec<String>,

    /// Outcome per generated file, in render order
    pub files: Vec<WriteOutcome>,

    /// Refusals and write failures
    pub errors: Vec<String>,
}

impl GenerationReport {
    /// Number of files written to disk
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.is_written()).count()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Main entry point for code generation
pub fn generate(config: &CodegenConfig) -> Result<GenerationReport> {
    config.validate()?;

    if config.dry_run {
        info!("Dry run!");
    }

    let tables = load_tables(config)?;
    info!("Generating {} tables into {:?}", tables.len(), config.output_dir);

    let files = render_tables(config, &tables);

    let mut writer = OutputWriter::new(OutputOptions::from(config));
    let outcomes: Vec<WriteOutcome> = files.iter().map(|file| writer.write(file)).collect();
    let errors = writer.into_errors();

    if errors.is_empty() {
        info!("Done.");
    } else {
        warn!("Finished with errors.");
        for error in &errors {
            warn!("{}", error);
        }
    }

    Ok(GenerationReport {
        tables: tables.iter().map(|t| t.name().to_string()).collect(),
        files: outcomes,
        errors,
    })
}

/// Load, normalize and select the tables named by the configuration
pub fn load_tables(config: &CodegenConfig) -> Result<Vec<TableDefinition>> {
    info!("Parsing schema: {:?}", config.schema_file);
    let document = parser::load_document(&config.schema_file)?;
    let meta = load_meta(config.meta_file.as_deref())?;

    let mut catalog = TypeCatalog::with_builtin_types();
    catalog.extend(config.value_objects.iter().cloned());
    let mut mapper = ValueObjectMapper::new(catalog);

    let tables = parser::normalize(&document, meta.as_ref(), &mut mapper)?;
    debug!("Normalized {} tables", tables.len());

    select_tables(tables, config.table.as_deref(), &config.schema_file)
}

/// Render every configured artifact kind for the given tables
pub fn render_tables(config: &CodegenConfig, tables: &[TableDefinition]) -> Vec<GeneratedFile> {
    CodeGenerator::new(RenderOptions::from(config)).render_all(&config.artifact_kinds(), tables)
}

fn load_meta(path: Option<&Path>) -> Result<Option<MetaOverlay>> {
    let Some(path) = path else {
        return Ok(None);
    };

    if !path.exists() {
        warn!("Meta file {} not found. Continuing without it.", path.display());
        return Ok(None);
    }

    debug!("Loading meta overlay: {:?}", path);
    let document = parser::load_document(path)?;
    MetaOverlay::from_value(&document).map(Some)
}

/// Keep only the requested table, or all of them
fn select_tables(
    tables: Vec<TableDefinition>,
    table: Option<&str>,
    schema: &Path,
) -> Result<Vec<TableDefinition>> {
    let selected = match table.filter(|t| *t != ALL_TABLES) {
        Some(name) => {
            let found: Vec<_> = tables.into_iter().filter(|t| t.name() == name).collect();
            if found.is_empty() {
                return Err(CodegenError::TableNotFound {
                    table: name.to_string(),
                    schema: schema.display().to_string(),
                });
            }
            found
        }
        None => tables,
    };

    if selected.is_empty() {
        return Err(CodegenError::NoTables);
    }

    Ok(selected)
}

/// Builder for configuring generation from code
pub struct GeneratorBuilder {
    config: CodegenConfig,
}

impl GeneratorBuilder {
    /// Create a new builder with the given schema file
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Set the base directory for generated files
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the namespace prefix of generated classes
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.base_namespace = namespace.to_string();
        self
    }

    /// Set the namespace prefix stripped from file paths
    pub fn ignored_namespace(mut self, namespace: &str) -> Self {
        self.config.ignored_namespace = namespace.to_string();
        self
    }

    /// Use a meta overlay document
    pub fn meta_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config.meta_file = Some(PathBuf::from(path.as_ref()));
        self
    }

    /// Generate a single table
    pub fn table(mut self, table: &str) -> Self {
        self.config.table = Some(table.to_string());
        self
    }

    /// Limit the generated artifact kinds
    pub fn artifacts(mut self, kinds: &[ArtifactKind]) -> Self {
        self.config.artifacts = kinds.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Set the key style read by `fromArray`
    pub fn key_style(mut self, style: KeyStyle) -> Self {
        self.config.array_key_style = style;
        self
    }

    /// Enable dry run mode (report without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// Overwrite existing files
    pub fn force(mut self) -> Self {
        self.config.force = true;
        self
    }

    /// Print generated files, or diffs against existing ones
    pub fn print(mut self) -> Self {
        self.config.print = true;
        self
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate the code
    pub fn generate(self) -> Result<GenerationReport> {
        generate(&self.config)
    }
}
