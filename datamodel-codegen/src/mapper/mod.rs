//! Column type mapping: scalar categories and value-object classes

mod type_map;
mod value_object;

pub use type_map::{map_column_type, resolve_column_type};
pub use value_object::{
    normalize_type_name, CallKind, EnumFamily, MethodCall, MethodDecl, TypeCatalog, TypeDecl,
    UuidFamily, ValueObjectFamily, ValueObjectMapper, ValueObjectMapping, Visibility,
};
