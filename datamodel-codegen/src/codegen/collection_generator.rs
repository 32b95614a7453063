//! Collection class generation

use super::code_generator::{ClassNames, RenderOptions};
use super::php::{Literal, Method, Parameter, PhpFile, PhpType, PropertyDecl, Visibility};
use super::ArtifactKind;
use crate::parser::TableDefinition;

pub(super) fn build_collection(
    table: &TableDefinition,
    names: &ClassNames,
    options: &RenderOptions,
) -> PhpFile {
    let mut file = PhpFile::new(
        &names.namespace(ArtifactKind::Collection),
        &names.class_name(ArtifactKind::Collection),
    );

    let base = file.namespace.add_use(&options.runtime.collection_base);
    let interface = file.namespace.add_use(&options.runtime.collection_interface);
    let data = file.namespace.add_use(&names.fqcn(ArtifactKind::Data));
    file.class.extends = Some(base);

    if let Some(mapping) = table
        .primary_key_property()
        .and_then(|pk| pk.value_object.as_ref())
    {
        file.class.add_property(
            PropertyDecl::new("idFieldSerializer", Visibility::Protected)
                .typed(PhpType::new("string"))
                .value(Literal::Str(mapping.to_string_call())),
        );
    }

    file.class.add_method(
        Method::new("create")
            .static_()
            .param(Parameter::new("data", PhpType::new("iterable")))
            .param(
                Parameter::new("idField", PhpType::nullable("string", true))
                    .default_value(Literal::Null),
            )
            .returns(PhpType::new(interface))
            .comment("@param iterable<int|string, mixed> $data")
            .body(&format!("return new static($data, {}::class, $idField);", data)),
    );

    let element = PhpType::new(format!("{}|false|null", data));
    let check = format!(
        "assert($data === null || $data === false || $data instanceof {});",
        data
    );

    file.class.add_method(
        Method::new("get")
            .param(Parameter::new("key", PhpType::new("string|int")))
            .returns(element.clone())
            .body(&format!("$data = parent::get($key);\n{}\n\nreturn $data;", check)),
    );

    file.class.add_method(
        Method::new("current")
            .returns(element)
            .body(&format!("$data = parent::current();\n{}\n\nreturn $data;", check)),
    );

    file
}
