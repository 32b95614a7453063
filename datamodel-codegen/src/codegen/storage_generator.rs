//! Low-level storage class generation

use super::code_generator::{ClassNames, RenderOptions};
use super::php::{Literal, Method, Parameter, PhpFile, PhpType, PropertyDecl, Visibility};
use super::ArtifactKind;
use crate::parser::TableDefinition;

pub(super) fn build_storage(
    table: &TableDefinition,
    names: &ClassNames,
    options: &RenderOptions,
) -> PhpFile {
    let mut file = PhpFile::new(
        &names.namespace(ArtifactKind::Storage),
        &names.class_name(ArtifactKind::Storage),
    );

    let base = file.namespace.add_use(&options.runtime.storage_base);
    let data = file.namespace.add_use(&names.fqcn(ArtifactKind::Data));
    let collection = file.namespace.add_use(&names.fqcn(ArtifactKind::Collection));
    file.class.extends = Some(base);

    file.class.add_property(
        PropertyDecl::new("tableName", Visibility::Protected)
            .typed(PhpType::new("string"))
            .value(Literal::Str(table.name().to_string())),
    );
    file.class.add_property(
        PropertyDecl::new("idField", Visibility::Protected)
            .typed(PhpType::nullable("string", true))
            .value(match table.primary_key() {
                Some(pk) => Literal::Str(pk.to_string()),
                None => Literal::Null,
            }),
    );
    file.class.add_property(
        PropertyDecl::new("rowFactoryClass", Visibility::Protected)
            .typed(PhpType::new("string"))
            .value(Literal::Raw(format!("{}::class", data))),
    );
    file.class.add_property(
        PropertyDecl::new("collectionFactory", Visibility::Protected)
            .typed(PhpType::new("string"))
            .value(Literal::Raw(format!("{}::class", collection))),
    );

    let single = PhpType::nullable(data.clone(), true);
    let single_check = format!("assert($data === null || $data instanceof {});", data);
    let many = PhpType::new(collection.clone());
    let many_check = format!("assert($data instanceof {});", collection);
    let many_doc = format!("@return {}<int|string, {}>", collection, data);

    file.class.add_method(
        Method::new("findOne")
            .param(Parameter::new("id", PhpType::new("string|int")))
            .returns(single.clone())
            .comment("@param string|int $id")
            .body(&delegate("findOne($id)", &single_check)),
    );

    file.class.add_method(
        Method::new("findOneByCriteria")
            .param(Parameter::new("criteria", PhpType::new("array")))
            .returns(single)
            .comment("@param array<int|string, mixed> $criteria")
            .body(&delegate("findOneByCriteria($criteria)", &single_check)),
    );

    file.class.add_method(
        paged(Method::new("find").param(Parameter::new("ids", PhpType::new("array"))))
            .returns(many.clone())
            .comment("@param array<int|string, mixed> $ids")
            .comment("")
            .comment(&many_doc)
            .body(&delegate("find($ids, $limit, $offset)", &many_check)),
    );

    file.class.add_method(
        paged(Method::new("findAll"))
            .returns(many.clone())
            .comment(&many_doc)
            .body(&delegate("findAll($limit, $offset)", &many_check)),
    );

    file.class.add_method(
        paged(Method::new("findByCriteria").param(Parameter::new("criteria", PhpType::new("array"))))
            .returns(many)
            .comment("@param array<int|string, mixed> $criteria")
            .comment("")
            .comment(&many_doc)
            .body(&delegate("findByCriteria($criteria, $limit, $offset)", &many_check)),
    );

    file
}

/// Append the optional `$limit` and `$offset` parameters
fn paged(method: Method) -> Method {
    method
        .param(Parameter::new("limit", PhpType::nullable("int", true)).default_value(Literal::Null))
        .param(Parameter::new("offset", PhpType::nullable("int", true)).default_value(Literal::Null))
}

/// Body calling the parent implementation and narrowing its result
fn delegate(call: &str, check: &str) -> String {
    format!("$data = parent::{};\n{}\n\nreturn $data;", call, check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::CodeGenerator;
    use crate::config::RuntimeClasses;
    use crate::parser::{Property, ScalarType};

    fn users() -> TableDefinition {
        TableDefinition::new(
            "users",
            vec![Property::new("id", ScalarType::Int)],
            Some("id".into()),
        )
        .unwrap()
    }

    #[test]
    fn test_storage_class() {
        let content = CodeGenerator::default()
            .render(ArtifactKind::Storage, &users())
            .content;

        assert!(content.starts_with(
            "<?php

declare(strict_types=1);

namespace App\\Model\\Users\\Storage;

use App\\Model\\Users\\Collection\\UsersCollection;
use App\\Model\\Users\\Data\\UsersData;
use MondayFactory\\DatabaseModel\\Storage\\ALowLevelRelationalDatabaseStorage;

class UsersDatabaseLowLevelStorage extends ALowLevelRelationalDatabaseStorage
{
\tprotected string $tableName = 'users';

\tprotected ?string $idField = 'id';

\tprotected string $rowFactoryClass = UsersData::class;

\tprotected string $collectionFactory = UsersCollection::class;
"
        ));

        assert!(content.contains(
            "\t/**
\t * @param string|int $id
\t */
\tpublic function findOne(string|int $id): ?UsersData
\t{
\t\t$data = parent::findOne($id);
\t\tassert($data === null || $data instanceof UsersData);

\t\treturn $data;
\t}
"
        ));

        assert!(content.contains(
            "\t/**
\t * @param array<int|string, mixed> $ids
\t *
\t * @return UsersCollection<int|string, UsersData>
\t */
\tpublic function find(array $ids, ?int $limit = null, ?int $offset = null): UsersCollection
\t{
\t\t$data = parent::find($ids, $limit, $offset);
\t\tassert($data instanceof UsersCollection);
"
        ));
    }

    #[test]
    fn test_storage_method_order() {
        let file = CodeGenerator::default().build(ArtifactKind::Storage, &users());
        let methods: Vec<_> = file.class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            methods,
            vec!["findOne", "findOneByCriteria", "find", "findAll", "findByCriteria"]
        );
        assert_eq!(
            file.class.method("findAll").unwrap().params.len(),
            2
        );
    }

    #[test]
    fn test_table_without_primary_key() {
        let table = TableDefinition::new(
            "logs",
            vec![Property::new("message", ScalarType::String)],
            None,
        )
        .unwrap();
        let content = CodeGenerator::default()
            .render(ArtifactKind::Storage, &table)
            .content;
        assert!(content.contains("\tprotected ?string $idField = null;\n"));
    }

    #[test]
    fn test_custom_storage_base() {
        let options = RenderOptions {
            runtime: RuntimeClasses {
                storage_base: "Acme\\Storage\\BaseStorage".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let content = CodeGenerator::new(options)
            .render(ArtifactKind::Storage, &users())
            .content;
        assert!(content.contains("use Acme\\Storage\\BaseStorage;\n"));
        assert!(content.contains("class UsersDatabaseLowLevelStorage extends BaseStorage\n"));
    }
}
