//! Schema normalizer for catalog dumps and grouped-column documents
//!
//! Two document shapes are accepted:
//!
//! - catalog dump: table name -> `{ columns: { name -> information_schema
//!   record } }`, optionally wrapped in a top-level `tables` key;
//! - grouped columns: a single table described by `databaseTable`,
//!   `databaseTableId` and `databaseCols.ro` / `databaseCols.rw`.
//!
//! Both produce [`TableDefinition`]s with columns in document order.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::metadata::{Property, ScalarType, TableDefinition};
use super::options::{parse_flag, ColumnOptions, MetaOverlay};
use crate::error::{CodegenError, Result};
use crate::mapper::{resolve_column_type, ValueObjectMapper};

/// Migration bookkeeping table, never generated
pub const HOUSEKEEPING_TABLE: &str = "phinxlog";

/// Detected layout of a schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    /// Per-table information_schema column records
    Catalog,
    /// One table with read-only and read-write column groups
    Grouped,
}

/// Detect the shape of a decoded schema document
pub fn detect_shape(document: &Value) -> Result<SchemaShape> {
    let root = document.as_object().ok_or_else(|| {
        CodegenError::InvalidSchema("schema document must be a mapping".into())
    })?;

    if root.contains_key("databaseTable") {
        Ok(SchemaShape::Grouped)
    } else {
        Ok(SchemaShape::Catalog)
    }
}

/// Normalize a schema document into table definitions
pub fn normalize(
    document: &Value,
    meta: Option<&MetaOverlay>,
    mapper: &mut ValueObjectMapper,
) -> Result<Vec<TableDefinition>> {
    SchemaNormalizer::new(mapper).with_meta(meta).normalize(document)
}

/// information_schema column record
#[derive(Debug, Default, Deserialize)]
struct CatalogColumn {
    #[serde(default, rename = "DATA_TYPE", alias = "dataType", alias = "data_type")]
    data_type: Value,

    #[serde(default, rename = "IS_NULLABLE", alias = "isNullable", alias = "nullable")]
    is_nullable: Value,

    #[serde(default, rename = "COLUMN_DEFAULT", alias = "columnDefault", alias = "default")]
    column_default: Value,

    #[serde(
        default,
        rename = "CHARACTER_MAXIMUM_LENGTH",
        alias = "characterMaximumLength",
        alias = "maxLength"
    )]
    max_length: Value,

    #[serde(default, rename = "COLUMN_KEY", alias = "columnKey")]
    column_key: Value,

    #[serde(default, rename = "COLUMN_COMMENT", alias = "columnComment", alias = "comment")]
    comment: Value,
}

/// Column record of a grouped-column document
#[derive(Debug, Default, Deserialize)]
struct GroupedColumn {
    #[serde(default, rename = "type")]
    data_type: Value,

    #[serde(default, alias = "nullbale")]
    nullable: Value,

    #[serde(default)]
    default: Value,

    #[serde(default, rename = "maxLength", alias = "max_length")]
    max_length: Value,

    #[serde(default)]
    comment: Value,
}

/// Source-independent column facts
struct RawColumn {
    name: String,
    data_type: String,
    nullable: bool,
    default: Option<String>,
    max_length: u32,
    comment: Option<String>,
    read_only: bool,
}

/// Turns decoded schema documents into table definitions
pub struct SchemaNormalizer<'a> {
    mapper: &'a mut ValueObjectMapper,
    meta: Option<&'a MetaOverlay>,
}

impl<'a> SchemaNormalizer<'a> {
    pub fn new(mapper: &'a mut ValueObjectMapper) -> Self {
        Self { mapper, meta: None }
    }

    /// Use explicit column options instead of column comments
    pub fn with_meta(mut self, meta: Option<&'a MetaOverlay>) -> Self {
        self.meta = meta;
        self
    }

    pub fn normalize(&mut self, document: &Value) -> Result<Vec<TableDefinition>> {
        match detect_shape(document)? {
            SchemaShape::Catalog => self.normalize_catalog(document),
            SchemaShape::Grouped => self.normalize_grouped(document),
        }
    }

    fn normalize_catalog(&mut self, document: &Value) -> Result<Vec<TableDefinition>> {
        let root = match document.get("tables") {
            Some(Value::Object(tables)) => tables,
            Some(_) => {
                return Err(CodegenError::InvalidSchema(
                    "\"tables\" must map table names to table records".into(),
                ))
            }
            None => document.as_object().ok_or_else(|| {
                CodegenError::InvalidSchema("schema document must be a mapping".into())
            })?,
        };

        let mut tables = Vec::new();

        for (table_name, table_def) in root {
            info!("Validating table {}.", table_name);

            if table_name == HOUSEKEEPING_TABLE {
                info!("Table {} cannot be generated. Skipping.", table_name);
                continue;
            }

            let columns = match table_def.get("columns") {
                Some(Value::Object(columns)) if !columns.is_empty() => columns,
                _ => {
                    info!("Table {} does not have any columns. Skipping.", table_name);
                    continue;
                }
            };

            info!("Preparing properties for table {}.", table_name);

            let mut properties = Vec::new();
            let mut primary_key: Option<String> = None;

            for (column_name, column_def) in columns {
                let record = match CatalogColumn::deserialize(column_def) {
                    Ok(record) => record,
                    Err(err) => {
                        warn!(
                            "Column {}.{} is not a column record ({}). Skipping.",
                            table_name, column_name, err
                        );
                        continue;
                    }
                };

                if string_value(&record.column_key).as_deref() == Some("PRI") {
                    match &primary_key {
                        None => primary_key = Some(column_name.clone()),
                        Some(first) => warn!(
                            "Table {} has a composite primary key; using {} and ignoring {}.",
                            table_name, first, column_name
                        ),
                    }
                }

                let Some(data_type) = string_value(&record.data_type) else {
                    warn!(
                        "Column {}.{} has no data type. Skipping.",
                        table_name, column_name
                    );
                    if primary_key.as_deref() == Some(column_name.as_str()) {
                        primary_key = None;
                    }
                    continue;
                };

                let column = RawColumn {
                    name: column_name.clone(),
                    data_type,
                    nullable: parse_flag(&record.is_nullable),
                    default: default_value(&record.column_default),
                    max_length: length_value(&record.max_length),
                    comment: string_value(&record.comment),
                    read_only: false,
                };
                properties.push(self.build_property(table_name, column));
            }

            if properties.is_empty() {
                info!("Table {} does not have any columns. Skipping.", table_name);
                continue;
            }

            match TableDefinition::new(table_name, properties, primary_key) {
                Ok(table) => tables.push(table),
                Err(err) => warn!("{}. Skipping table {}.", err, table_name),
            }
        }

        Ok(tables)
    }

    fn normalize_grouped(&mut self, document: &Value) -> Result<Vec<TableDefinition>> {
        let table_name = document
            .get("databaseTable")
            .and_then(string_value)
            .ok_or_else(|| {
                CodegenError::InvalidSchema("\"databaseTable\" must name the table".into())
            })?;
        let table_id = document.get("databaseTableId").and_then(string_value);

        info!("Validating table {}.", table_name);

        let groups = match document.get("databaseCols") {
            Some(Value::Object(groups)) => groups.clone(),
            None | Some(Value::Null) => Map::new(),
            Some(_) => {
                return Err(CodegenError::InvalidSchema(
                    "\"databaseCols\" must contain \"ro\" and \"rw\" groups".into(),
                ))
            }
        };

        for key in groups.keys() {
            if key != "ro" && key != "rw" {
                warn!("Unknown column group {} in table {}. Ignoring.", key, table_name);
            }
        }

        info!("Preparing properties for table {}.", table_name);

        let mut properties = Vec::new();
        for (group, read_only) in [("ro", true), ("rw", false)] {
            let columns = match groups.get(group) {
                Some(Value::Object(columns)) => columns,
                None | Some(Value::Null) => continue,
                Some(other) => {
                    warn!(
                        "Column group {} of table {} is not a mapping ({}). Ignoring.",
                        group, table_name, other
                    );
                    continue;
                }
            };

            for (column_name, column_def) in columns {
                let record = match GroupedColumn::deserialize(column_def) {
                    Ok(record) => record,
                    Err(err) => {
                        warn!(
                            "Column {}.{} is not a column record ({}). Skipping.",
                            table_name, column_name, err
                        );
                        continue;
                    }
                };

                let Some(data_type) = string_value(&record.data_type) else {
                    warn!(
                        "Column {}.{} has no data type. Skipping.",
                        table_name, column_name
                    );
                    continue;
                };

                let column = RawColumn {
                    name: column_name.clone(),
                    data_type,
                    nullable: parse_flag(&record.nullable),
                    default: default_value(&record.default),
                    max_length: length_value(&record.max_length),
                    comment: string_value(&record.comment),
                    read_only,
                };
                properties.push(self.build_property(&table_name, column));
            }
        }

        if properties.is_empty() {
            info!("Table {} does not have any columns. Skipping.", table_name);
            return Ok(Vec::new());
        }

        let primary_key = match table_id {
            Some(id) if properties.iter().any(|p| p.name == id) => Some(id),
            Some(id) => {
                warn!(
                    "Primary key {} is not a column of table {}. Ignoring.",
                    id, table_name
                );
                None
            }
            None => None,
        };

        match TableDefinition::new(&table_name, properties, primary_key) {
            Ok(table) => Ok(vec![table]),
            Err(err) => {
                warn!("{}. Skipping table {}.", err, table_name);
                Ok(Vec::new())
            }
        }
    }

    fn build_property(&mut self, table_name: &str, column: RawColumn) -> Property {
        let options = match self.meta {
            Some(meta) => meta.column(table_name, &column.name),
            None => column
                .comment
                .as_deref()
                .map(ColumnOptions::from_comment)
                .unwrap_or_default(),
        };

        // A data type naming a value-object class stores its string form
        let (scalar_type, mut mapping) = if self.mapper.is_known(&column.data_type) {
            (ScalarType::String, self.mapper.resolve(&column.data_type))
        } else {
            (resolve_column_type(&column.data_type), None)
        };

        if let Some(type_class) = options.type_class.as_deref() {
            if self.mapper.is_known(type_class) {
                if let Some(resolved) = self.mapper.resolve(type_class) {
                    mapping = Some(resolved);
                }
            } else {
                warn!(
                    "Invalid type class \"{}\" for column {}.{}",
                    type_class, table_name, column.name
                );
            }
        }

        let default = if mapping.is_some() || !scalar_type.accepts_literal_default() {
            None
        } else {
            column.default
        };

        debug!(
            "Column {}.{}: {} (nullable: {}, read-only: {}, value object: {})",
            table_name,
            column.name,
            scalar_type,
            column.nullable,
            column.read_only || options.read_only,
            mapping.as_ref().map(|m| m.class_name.as_str()).unwrap_or("-")
        );

        Property::new(&column.name, scalar_type)
            .nullable(column.nullable)
            .with_default(default)
            .with_max_length(column.max_length)
            .read_only(column.read_only || options.read_only)
            .with_value_object(mapping)
    }
}

/// Non-empty string form of a scalar value
fn string_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Raw default as stored in the catalog; `NULL` means no default
fn default_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.eq_ignore_ascii_case("null") => None,
        Value::String(s) => {
            // MariaDB quotes string defaults
            let unquoted = s
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
                .unwrap_or(s);
            Some(unquoted.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        other => {
            warn!("Unsupported default value {}. Ignoring.", other);
            None
        }
    }
}

fn length_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n.min(u32::MAX as u64) as u32).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
