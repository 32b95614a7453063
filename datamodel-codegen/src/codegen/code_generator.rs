//! Main code generator orchestrator

use tracing::info;

use super::collection_generator::build_collection;
use super::data_generator::build_data;
use super::naming::{join_namespace, to_pascal_case, KeyStyle};
use super::php::PhpFile;
use super::printer::Printer;
use super::storage_generator::build_storage;
use super::ArtifactKind;
use crate::config::{defaults, CodegenConfig, RuntimeClasses};
use crate::parser::TableDefinition;

/// Settings shared by the artifact renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Namespace prefix of generated classes
    pub base_namespace: String,

    /// Key style read by `fromArray`
    pub key_style: KeyStyle,

    /// Format used to serialize datetime columns
    pub datetime_format: String,

    /// Runtime library classes
    pub runtime: RuntimeClasses,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_namespace: defaults::BASE_NAMESPACE.to_string(),
            key_style: KeyStyle::default(),
            datetime_format: defaults::DATETIME_FORMAT.to_string(),
            runtime: RuntimeClasses::default(),
        }
    }
}

impl From<&CodegenConfig> for RenderOptions {
    fn from(config: &CodegenConfig) -> Self {
        Self {
            base_namespace: config.base_namespace.clone(),
            key_style: config.array_key_style,
            datetime_format: config.datetime_format.clone(),
            runtime: config.runtime.clone(),
        }
    }
}

/// Namespaces and class names derived from a table name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    root: String,
    base: String,
}

impl ClassNames {
    pub fn new(base_namespace: &str, table_name: &str) -> Self {
        let base = to_pascal_case(table_name);
        Self {
            root: join_namespace([base_namespace, base.as_str()]),
            base,
        }
    }

    /// `<base>\<Table>\<Data|Collection|Storage>`
    pub fn namespace(&self, kind: ArtifactKind) -> String {
        join_namespace([self.root.as_str(), kind.namespace_segment()])
    }

    /// `<Table><Data|Collection|DatabaseLowLevelStorage>`
    pub fn class_name(&self, kind: ArtifactKind) -> String {
        format!("{}{}", self.base, kind.class_suffix())
    }

    pub fn fqcn(&self, kind: ArtifactKind) -> String {
        join_namespace([self.namespace(kind).as_str(), self.class_name(kind).as_str()])
    }
}

/// One rendered class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub table: String,
    pub kind: ArtifactKind,
    /// Fully-qualified class name
    pub fqcn: String,
    pub content: String,
}

/// Renders table definitions into PHP classes
#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    options: RenderOptions,
    printer: Printer,
}

impl CodeGenerator {
    /// Create a new code generator with the given options
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            printer: Printer::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Build the class tree of one artifact
    pub fn build(&self, kind: ArtifactKind, table: &TableDefinition) -> PhpFile {
        let names = ClassNames::new(&self.options.base_namespace, table.name());
        match kind {
            ArtifactKind::Data => build_data(table, &names, &self.options),
            ArtifactKind::Collection => build_collection(table, &names, &self.options),
            ArtifactKind::Storage => build_storage(table, &names, &self.options),
        }
    }

    /// Render one artifact to source text
    pub fn render(&self, kind: ArtifactKind, table: &TableDefinition) -> GeneratedFile {
        let file = self.build(kind, table);
        GeneratedFile {
            table: table.name().to_string(),
            kind,
            fqcn: file.class_fqcn(),
            content: self.printer.print_file(&file),
        }
    }

    /// Render every requested artifact kind for every table, kind by kind
    pub fn render_all(
        &self,
        kinds: &[ArtifactKind],
        tables: &[TableDefinition],
    ) -> Vec<GeneratedFile> {
        let mut files = Vec::with_capacity(kinds.len() * tables.len());
        for &kind in kinds {
            for table in tables {
                info!("GENERATE {} for table {}", kind, table.name());
                files.push(self.render(kind, table));
            }
        }
        files
    }
}
