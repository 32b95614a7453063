//! Value-object mappings for wrapped column types (UUIDs, enums)
//!
//! A column whose type names a known value-object class is exposed through
//! that class in generated signatures. The mapping describes how to build the
//! object from the raw column string and how to turn it back into one.
//!
//! Which classes exist, how they inherit from each other and which methods
//! they declare is described by a [`TypeCatalog`]. Each supported family of
//! value objects implements [`ValueObjectFamily`], and a mapping is only
//! accepted when the catalog confirms that both conversion methods are public
//! and take at most one required parameter.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::MappingError;

/// How a conversion method is invoked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// `Class::method(...)`
    Static,
    /// `$value->method(...)`
    #[default]
    Instance,
}

/// Method visibility as declared on the class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A method declared on a catalog type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,

    #[serde(default)]
    pub kind: CallKind,

    #[serde(default)]
    pub visibility: Visibility,

    /// Number of parameters without a default value
    #[serde(default)]
    pub required_params: usize,
}

impl MethodDecl {
    /// A public static method
    pub fn public_static(name: &str, required_params: usize) -> Self {
        Self {
            name: name.to_string(),
            kind: CallKind::Static,
            visibility: Visibility::Public,
            required_params,
        }
    }

    /// A public instance method
    pub fn public_instance(name: &str, required_params: usize) -> Self {
        Self {
            name: name.to_string(),
            kind: CallKind::Instance,
            visibility: Visibility::Public,
            required_params,
        }
    }
}

/// A class or interface known to the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Fully-qualified name, without a leading backslash
    pub name: String,

    /// Parent class, if any
    #[serde(default)]
    pub parent: Option<String>,

    /// Methods declared directly on this type
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_type_name(name).to_string(),
            parent: None,
            methods: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(normalize_type_name(parent).to_string());
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

/// Strip surrounding whitespace and a leading namespace separator
pub fn normalize_type_name(name: &str) -> &str {
    name.trim().trim_start_matches('\\')
}

/// Registry of loadable types and their declared methods
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<String, TypeDecl>,
}

impl TypeCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog with the UUID and enum libraries pre-registered
    pub fn with_builtin_types() -> Self {
        let mut catalog = Self::new();
        catalog.register(
            TypeDecl::new(UUID_INTERFACE).with_method(MethodDecl::public_instance("toString", 0)),
        );
        catalog.register(
            TypeDecl::new(UUID_CLASS)
                .with_method(MethodDecl::public_static("fromString", 1))
                .with_method(MethodDecl::public_instance("toString", 0)),
        );
        catalog.register(
            TypeDecl::new(ENUM_BASE_CLASS)
                .with_method(MethodDecl::public_static("get", 1))
                .with_method(MethodDecl::public_instance("getValue", 0)),
        );
        catalog
    }

    /// Register (or replace) a type declaration
    pub fn register(&mut self, mut decl: TypeDecl) {
        decl.name = normalize_type_name(&decl.name).to_string();
        decl.parent = decl
            .parent
            .as_deref()
            .map(|p| normalize_type_name(p).to_string());
        self.types.insert(decl.name.clone(), decl);
    }

    /// Whether the type is known
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(normalize_type_name(name))
    }

    /// The type followed by its ancestors, most-derived first.
    ///
    /// Unknown parents end the chain; cycles are cut at the first repeat.
    pub fn lineage(&self, name: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(normalize_type_name(name).to_string());

        while let Some(type_name) = current {
            if !seen.insert(type_name.clone()) {
                break;
            }
            current = self.types.get(&type_name).and_then(|t| t.parent.clone());
            chain.push(type_name);
        }

        chain
    }

    /// Find a method on the type or the nearest ancestor declaring it
    pub fn find_method(&self, type_name: &str, method: &str) -> Option<&MethodDecl> {
        self.lineage(type_name)
            .iter()
            .filter_map(|name| self.types.get(name))
            .find_map(|decl| decl.methods.iter().find(|m| m.name == method))
    }
}

impl Extend<TypeDecl> for TypeCatalog {
    fn extend<I: IntoIterator<Item = TypeDecl>>(&mut self, iter: I) {
        for decl in iter {
            self.register(decl);
        }
    }
}

const UUID_INTERFACE: &str = "Ramsey\\Uuid\\UuidInterface";
const UUID_CLASS: &str = "Ramsey\\Uuid\\Uuid";
const ENUM_BASE_CLASS: &str = "Consistence\\Enum\\Enum";

/// Capability contract of a family of value objects.
///
/// A family names the method building the object from a raw string and the
/// method converting it back.
pub trait ValueObjectFamily: fmt::Debug + Send + Sync {
    /// Short family name used in diagnostics
    fn name(&self) -> &'static str;

    /// Method constructing the value object from a raw string
    fn from_string_method(&self) -> &'static str;

    /// Method converting the value object back to a raw string
    fn to_string_method(&self) -> &'static str;

    /// Class providing the conversion methods for `type_name`
    fn class_name(&self, type_name: &str) -> String {
        type_name.to_string()
    }

    /// Type used in generated signatures for `type_name`
    fn interface_name(&self, type_name: &str) -> String {
        self.class_name(type_name)
    }
}

/// `ramsey/uuid` identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidFamily;

impl ValueObjectFamily for UuidFamily {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn from_string_method(&self) -> &'static str {
        "fromString"
    }

    fn to_string_method(&self) -> &'static str {
        "toString"
    }

    fn class_name(&self, _type_name: &str) -> String {
        UUID_CLASS.to_string()
    }

    fn interface_name(&self, _type_name: &str) -> String {
        UUID_INTERFACE.to_string()
    }
}

/// `consistence/consistence` enums
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumFamily;

impl ValueObjectFamily for EnumFamily {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn from_string_method(&self) -> &'static str {
        "get"
    }

    fn to_string_method(&self) -> &'static str {
        "getValue"
    }
}

/// A resolved conversion method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub kind: CallKind,
}

/// Conversion between a raw column string and a value object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueObjectMapping {
    /// Family that produced the mapping
    pub family: &'static str,

    /// Class providing the conversion methods
    pub class_name: String,

    /// Type exposed in generated signatures
    pub interface_name: String,

    pub from_string: MethodCall,

    pub to_string: MethodCall,
}

impl ValueObjectMapping {
    /// Type exposed in generated signatures
    pub fn public_type(&self) -> &str {
        &self.interface_name
    }

    /// Expression building the value object from `raw_expr`.
    ///
    /// `class_ref` is how the generated file refers to [`Self::class_name`].
    pub fn from_string_literal(&self, class_ref: &str, raw_expr: &str) -> String {
        match self.from_string.kind {
            CallKind::Static => format!("{}::{}({})", class_ref, self.from_string.method, raw_expr),
            CallKind::Instance => format!("{}->{}()", raw_expr, self.from_string.method),
        }
    }

    /// Expression converting `value_expr` back to a raw string
    pub fn to_string_literal(&self, class_ref: &str, value_expr: &str) -> String {
        match self.to_string.kind {
            CallKind::Static => format!("{}::{}({})", class_ref, self.to_string.method, value_expr),
            CallKind::Instance => format!("{}->{}()", value_expr, self.to_string.method),
        }
    }

    /// Accessor call text used by collections to stringify keys
    pub fn to_string_call(&self) -> String {
        match self.to_string.kind {
            CallKind::Static => format!("\\{}::{}()", self.class_name, self.to_string.method),
            CallKind::Instance => format!("->{}()", self.to_string.method),
        }
    }
}

/// Resolves type names to value-object mappings, caching per run
#[derive(Debug)]
pub struct ValueObjectMapper {
    catalog: TypeCatalog,
    families: HashMap<String, Arc<dyn ValueObjectFamily>>,
    cache: HashMap<String, Option<Arc<ValueObjectMapping>>>,
}

impl Default for ValueObjectMapper {
    fn default() -> Self {
        Self::new(TypeCatalog::with_builtin_types())
    }
}

impl ValueObjectMapper {
    /// Create a mapper with the built-in UUID and enum families
    pub fn new(catalog: TypeCatalog) -> Self {
        let mut mapper = Self {
            catalog,
            families: HashMap::new(),
            cache: HashMap::new(),
        };
        mapper.register_family(UUID_INTERFACE, Arc::new(UuidFamily));
        mapper.register_family(UUID_CLASS, Arc::new(UuidFamily));
        mapper.register_family(ENUM_BASE_CLASS, Arc::new(EnumFamily));
        mapper
    }

    /// Bind a family to a type and everything inheriting from it
    pub fn register_family(&mut self, type_name: &str, family: Arc<dyn ValueObjectFamily>) {
        self.families
            .insert(normalize_type_name(type_name).to_string(), family);
        self.cache.clear();
    }

    /// Whether the type name is a loadable type
    pub fn is_known(&self, type_name: &str) -> bool {
        let name = normalize_type_name(type_name);
        !name.is_empty() && self.catalog.contains(name)
    }

    /// Resolve a type name to a mapping.
    ///
    /// Returns `None` for empty, unknown or unmapped types; a type whose
    /// conversion methods fail validation is reported and also yields `None`.
    pub fn resolve(&mut self, type_name: &str) -> Option<Arc<ValueObjectMapping>> {
        let name = normalize_type_name(type_name);
        if name.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get(name) {
            return cached.clone();
        }

        let resolved = match self.try_resolve(name) {
            Ok(mapping) => mapping.map(Arc::new),
            Err(err) => {
                warn!("Value object mapping for {} rejected: {}", name, err);
                None
            }
        };

        self.cache.insert(name.to_string(), resolved.clone());
        resolved
    }

    /// Resolve without caching, surfacing validation failures
    pub fn try_resolve(&self, type_name: &str) -> Result<Option<ValueObjectMapping>, MappingError> {
        let name = normalize_type_name(type_name);
        if !self.is_known(name) {
            debug!("Type {} is not a known value object type", name);
            return Ok(None);
        }

        let family = self
            .catalog
            .lineage(name)
            .iter()
            .find_map(|ancestor| self.families.get(ancestor).cloned());

        let Some(family) = family else {
            debug!("Type {} does not belong to a value object family", name);
            return Ok(None);
        };

        let class_name = family.class_name(name);
        let from_string = self.validated_call(&class_name, family.from_string_method())?;
        let to_string = self.validated_call(&class_name, family.to_string_method())?;

        debug!("Type {} mapped as {} value object", name, family.name());

        Ok(Some(ValueObjectMapping {
            family: family.name(),
            interface_name: family.interface_name(name),
            class_name,
            from_string,
            to_string,
        }))
    }

    fn validated_call(&self, class_name: &str, method: &str) -> Result<MethodCall, MappingError> {
        let decl = self
            .catalog
            .find_method(class_name, method)
            .ok_or_else(|| MappingError::MissingMethod {
                class: class_name.to_string(),
                method: method.to_string(),
            })?;

        if decl.visibility != Visibility::Public {
            return Err(MappingError::NotPublic {
                class: class_name.to_string(),
                method: method.to_string(),
            });
        }

        if decl.required_params > 1 {
            return Err(MappingError::TooManyParameters {
                class: class_name.to_string(),
                method: method.to_string(),
                required: decl.required_params,
            });
        }

        Ok(MethodCall {
            method: decl.name.clone(),
            kind: decl.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_enum(name: &str) -> TypeCatalog {
        let mut catalog = TypeCatalog::with_builtin_types();
        catalog.register(TypeDecl::new(name).with_parent(ENUM_BASE_CLASS));
        catalog
    }

    #[test]
    fn test_uuid_interface_resolves() {
        let mut mapper = ValueObjectMapper::default();
        let mapping = mapper.resolve("\\Ramsey\\Uuid\\UuidInterface").unwrap();

        assert_eq!(mapping.family, "uuid");
        assert_eq!(mapping.class_name, "Ramsey\\Uuid\\Uuid");
        assert_eq!(mapping.public_type(), "Ramsey\\Uuid\\UuidInterface");
        assert_eq!(mapping.from_string.kind, CallKind::Static);
        assert_eq!(mapping.to_string.kind, CallKind::Instance);
    }

    #[test]
    fn test_enum_subclass_resolves_through_ancestor() {
        let mut mapper = ValueObjectMapper::new(catalog_with_enum("App\\Enum\\Status"));
        let mapping = mapper.resolve("App\\Enum\\Status").unwrap();

        assert_eq!(mapping.family, "enum");
        assert_eq!(mapping.class_name, "App\\Enum\\Status");
        assert_eq!(mapping.public_type(), "App\\Enum\\Status");
        assert_eq!(mapping.from_string.method, "get");
        assert_eq!(mapping.to_string.method, "getValue");
    }

    #[test]
    fn test_unknown_and_empty_types_do_not_resolve() {
        let mut mapper = ValueObjectMapper::default();
        assert!(mapper.resolve("").is_none());
        assert!(mapper.resolve("varchar").is_none());
        assert!(mapper.resolve("App\\Missing").is_none());
    }

    #[test]
    fn test_known_type_outside_families_does_not_resolve() {
        let mut catalog = TypeCatalog::with_builtin_types();
        catalog.register(TypeDecl::new("App\\Money"));
        let mut mapper = ValueObjectMapper::new(catalog);
        assert!(mapper.is_known("App\\Money"));
        assert!(mapper.resolve("App\\Money").is_none());
    }

    #[test]
    fn test_non_public_method_is_rejected() {
        let mut catalog = catalog_with_enum("App\\Enum\\Secret");
        catalog.register(
            TypeDecl::new("App\\Enum\\Secret")
                .with_parent(ENUM_BASE_CLASS)
                .with_method(MethodDecl {
                    name: "getValue".to_string(),
                    kind: CallKind::Instance,
                    visibility: Visibility::Private,
                    required_params: 0,
                }),
        );
        let mut mapper = ValueObjectMapper::new(catalog);

        assert_eq!(
            mapper.try_resolve("App\\Enum\\Secret").unwrap_err(),
            MappingError::NotPublic {
                class: "App\\Enum\\Secret".to_string(),
                method: "getValue".to_string(),
            }
        );
        assert!(mapper.resolve("App\\Enum\\Secret").is_none());
    }

    #[test]
    fn test_too_many_required_parameters_is_rejected() {
        let mut catalog = TypeCatalog::with_builtin_types();
        catalog.register(
            TypeDecl::new("App\\Enum\\Pair")
                .with_parent(ENUM_BASE_CLASS)
                .with_method(MethodDecl::public_static("get", 2)),
        );
        let mapper = ValueObjectMapper::new(catalog);

        assert!(matches!(
            mapper.try_resolve("App\\Enum\\Pair"),
            Err(MappingError::TooManyParameters { required: 2, .. })
        ));
    }

    #[test]
    fn test_missing_method_is_rejected() {
        let mut catalog = TypeCatalog::new();
        catalog.register(TypeDecl::new(ENUM_BASE_CLASS));
        catalog.register(TypeDecl::new("App\\Enum\\Bare").with_parent(ENUM_BASE_CLASS));
        let mapper = ValueObjectMapper::new(catalog);

        assert!(matches!(
            mapper.try_resolve("App\\Enum\\Bare"),
            Err(MappingError::MissingMethod { method, .. }) if method == "get"
        ));
    }

    #[test]
    fn test_lineage_stops_on_cycle() {
        let mut catalog = TypeCatalog::new();
        catalog.register(TypeDecl::new("A").with_parent("B"));
        catalog.register(TypeDecl::new("B").with_parent("A"));
        assert_eq!(catalog.lineage("A"), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_literals() {
        let mut mapper = ValueObjectMapper::default();
        let uuid = mapper.resolve("Ramsey\\Uuid\\Uuid").unwrap();

        assert_eq!(
            uuid.from_string_literal("Uuid", "$row['id']"),
            "Uuid::fromString($row['id'])"
        );
        assert_eq!(uuid.to_string_literal("Uuid", "$this->id"), "$this->id->toString()");
        assert_eq!(uuid.to_string_call(), "->toString()");
    }

    #[test]
    fn test_instance_constructor_literal() {
        let mapping = ValueObjectMapping {
            family: "custom",
            class_name: "App\\Slug".to_string(),
            interface_name: "App\\Slug".to_string(),
            from_string: MethodCall {
                method: "parse".to_string(),
                kind: CallKind::Instance,
            },
            to_string: MethodCall {
                method: "format".to_string(),
                kind: CallKind::Static,
            },
        };

        assert_eq!(mapping.from_string_literal("Slug", "$raw"), "$raw->parse()");
        assert_eq!(mapping.to_string_literal("Slug", "$this->slug"), "Slug::format($this->slug)");
        assert_eq!(mapping.to_string_call(), "\\App\\Slug::format()");
    }
}
