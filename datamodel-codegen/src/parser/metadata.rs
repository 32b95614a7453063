//! Canonical table model produced by the schema normalizer

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::codegen::naming::{to_camel_case, to_pascal_case};
use crate::error::{CodegenError, Result};
use crate::mapper::ValueObjectMapping;

/// Scalar category of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    Float,
    Bool,
    String,
    Json,
    DateTime,
}

impl ScalarType {
    /// Category name as used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Json => "json",
            ScalarType::DateTime => "datetime",
        }
    }

    /// Type used in generated PHP signatures
    pub fn php_type(&self) -> &'static str {
        match self {
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Json => "array",
            ScalarType::DateTime => "\\DateTimeInterface",
        }
    }

    /// Cast prefix applied when hydrating from a raw row, if any
    pub fn cast(&self) -> Option<&'static str> {
        match self {
            ScalarType::Int => Some("(int)"),
            ScalarType::Float => Some("(float)"),
            ScalarType::Bool => Some("(bool)"),
            ScalarType::String => Some("(string)"),
            ScalarType::Json | ScalarType::DateTime => None,
        }
    }

    /// Whether raw defaults can be rendered as literals for this category
    pub fn accepts_literal_default(&self) -> bool {
        !matches!(self, ScalarType::Json | ScalarType::DateTime)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the generated members for one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessors {
    /// Class property / constructor parameter name
    pub field: String,
    /// Public getter
    pub getter: String,
    /// Private hydration setter
    pub setter: String,
}

impl Accessors {
    fn for_column(column: &str) -> Self {
        let pascal = to_pascal_case(column);
        Self {
            field: to_camel_case(column),
            getter: format!("get{}", pascal),
            setter: format!("set{}", pascal),
        }
    }
}

/// One column's generation-relevant facts
#[derive(Debug, Clone)]
pub struct Property {
    /// Raw column name
    pub name: String,

    pub scalar_type: ScalarType,

    pub nullable: bool,

    /// Raw default; `None` means no default or SQL `NULL`
    pub default_value: Option<String>,

    /// Maximum length, 0 when unbounded or unknown
    pub max_length: u32,

    /// Set only during hydration from a row
    pub read_only: bool,

    pub value_object: Option<Arc<ValueObjectMapping>>,

    accessors: Accessors,
}

impl Property {
    pub fn new(name: &str, scalar_type: ScalarType) -> Self {
        Self {
            name: name.to_string(),
            scalar_type,
            nullable: false,
            default_value: None,
            max_length: 0,
            read_only: false,
            value_object: None,
            accessors: Accessors::for_column(name),
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default(mut self, default_value: Option<String>) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_value_object(mut self, mapping: Option<Arc<ValueObjectMapping>>) -> Self {
        self.value_object = mapping;
        self
    }

    /// Generated member names
    pub fn accessors(&self) -> &Accessors {
        &self.accessors
    }

    /// Type used in generated signatures
    pub fn public_type(&self) -> &str {
        match &self.value_object {
            Some(mapping) => mapping.public_type(),
            None => self.scalar_type.php_type(),
        }
    }

    /// Whether the column is wrapped in a value object
    pub fn is_value_object(&self) -> bool {
        self.value_object.is_some()
    }

    /// Whether the property has a default usable as a constructor default.
    ///
    /// True for a non-empty default on a column without a value object, for
    /// the literal `0`, and for a nullable column without a default (`null`).
    pub fn has_default_value(&self) -> bool {
        match self.default_value.as_deref() {
            Some("0") => true,
            Some(value) => !value.is_empty() && self.value_object.is_none(),
            None => self.nullable,
        }
    }
}

/// One table's generation-relevant facts
#[derive(Debug, Clone)]
pub struct TableDefinition {
    name: String,
    properties: Vec<Property>,
    primary_key: Option<String>,
}

impl TableDefinition {
    /// Build a table, checking that column names and generated field names
    /// are unique and that the primary key names one of the columns.
    ///
    /// Field names are compared case-insensitively since they also name the
    /// generated accessors.
    pub fn new(name: &str, properties: Vec<Property>, primary_key: Option<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut fields: HashMap<String, &str> = HashMap::new();
        for property in &properties {
            if !seen.insert(property.name.as_str()) {
                return Err(CodegenError::InvalidSchema(format!(
                    "Table {} declares column {} more than once",
                    name, property.name
                )));
            }

            let field = property.accessors().field.to_lowercase();
            if let Some(other) = fields.insert(field, property.name.as_str()) {
                return Err(CodegenError::InvalidSchema(format!(
                    "Columns {} and {} of table {} map to the same field {}",
                    other,
                    property.name,
                    name,
                    property.accessors().field
                )));
            }
        }

        if let Some(pk) = &primary_key {
            if !seen.contains(pk.as_str()) {
                return Err(CodegenError::InvalidSchema(format!(
                    "Primary key {} of table {} is not one of its columns",
                    pk, name
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            properties,
            primary_key,
        })
    }

    /// Raw table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All properties in declared order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Get a property by column name
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Primary key column name
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    pub fn primary_key_property(&self) -> Option<&Property> {
        self.primary_key().and_then(|pk| self.get_property(pk))
    }

    /// Constructor-assigned properties in declared order
    pub fn read_write_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| !p.read_only)
    }

    /// Hydration-only properties in declared order
    pub fn read_only_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.read_only)
    }

    pub fn has_read_only_properties(&self) -> bool {
        self.properties.iter().any(|p| p.read_only)
    }
}
