//! CLI entry point for datamodel-codegen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use datamodel_codegen::config::CodegenConfig;
use datamodel_codegen::ALL_TABLES;

#[derive(Parser)]
#[command(name = "datamodel-codegen")]
#[command(about = "Generate PHP data, collection and storage classes from a table schema")]
#[command(version)]
struct Cli {
    /// Table to generate (`-` or omitted for all tables)
    table: Option<String>,

    /// Artifact kinds to generate (collection, data, llstorage)
    artifacts: Vec<String>,

    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to schema document (overrides config)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Path to meta overlay document (overrides config)
    #[arg(short, long)]
    meta: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Namespace prefix of generated classes (overrides config)
    #[arg(long)]
    namespace: Option<String>,

    /// Namespace prefix stripped from file paths (overrides config)
    #[arg(short = 'I', long)]
    ignored_namespace: Option<String>,

    /// Dry run - report what would be written without writing files
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing files
    #[arg(short, long)]
    force: bool,

    /// Print generated files, or a diff against existing ones
    #[arg(short, long)]
    print: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model classes
    Generate,
    /// Inspect schema (show normalized tables for debugging)
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    // Logs go to stderr so printed classes stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Apply CLI overrides
    if let Some(schema) = cli.schema {
        config.schema_file = schema;
    }
    if let Some(meta) = cli.meta {
        config.meta_file = Some(meta);
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(namespace) = cli.namespace {
        config.base_namespace = namespace;
    }
    if let Some(ignored) = cli.ignored_namespace {
        config.ignored_namespace = ignored;
    }
    match cli.table.as_deref() {
        Some(ALL_TABLES) => config.table = None,
        Some(table) => config.table = Some(table.to_string()),
        None => {}
    }
    if !cli.artifacts.is_empty() {
        config.artifacts = cli.artifacts;
    }
    config.dry_run |= cli.dry_run;
    config.force |= cli.force;
    config.print |= cli.print;

    if let Some(Commands::Inspect) = cli.command {
        config.validate()?;
        return inspect_schema(&config);
    }

    info!("Generating model classes from schema: {:?}", config.schema_file);
    let report = datamodel_codegen::generate(&config)?;

    info!(
        "Processed {} tables, wrote {} of {} files",
        report.tables.len(),
        report.written(),
        report.files.len()
    );
    Ok(())
}

fn inspect_schema(config: &CodegenConfig) -> Result<()> {
    let tables = datamodel_codegen::load_tables(config)?;

    println!("Normalized {} tables:\n", tables.len());
    for table in &tables {
        println!("Table: {}", table.name());
        println!("  Columns:");
        for prop in table.properties() {
            let nullable = if prop.nullable { "NULL" } else { "NOT NULL" };
            let read_only = if prop.read_only { " READONLY" } else { "" };
            println!(
                "    - {} {} {}{}",
                prop.name, prop.scalar_type, nullable, read_only
            );
            if let Some(default) = &prop.default_value {
                println!("      DEFAULT: {}", default);
            }
            if let Some(mapping) = &prop.value_object {
                println!("      VALUE OBJECT: {}", mapping.public_type());
            }
        }
        if let Some(pk) = table.primary_key() {
            println!("  Primary Key: {}", pk);
        }
        println!();
    }

    Ok(())
}
