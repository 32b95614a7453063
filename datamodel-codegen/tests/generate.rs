//! End-to-end generation tests
//!
//! Each test writes a schema document into a temporary directory, runs the
//! full pipeline and inspects the files left in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use datamodel_codegen::codegen::ArtifactKind;
use datamodel_codegen::output::WriteOutcome;
use datamodel_codegen::{generate, CodegenConfig, CodegenError, GeneratorBuilder};
use tempfile::TempDir;

const CATALOG_SCHEMA: &str = r#"{
    "tables": {
        "phinxlog": {
            "columns": {
                "version": {"DATA_TYPE": "bigint", "IS_NULLABLE": "NO", "COLUMN_KEY": "PRI"}
            }
        },
        "users": {
            "columns": {
                "id": {"DATA_TYPE": "int", "IS_NULLABLE": "NO", "COLUMN_KEY": "PRI"},
                "email": {"DATA_TYPE": "varchar", "IS_NULLABLE": "NO", "CHARACTER_MAXIMUM_LENGTH": 255},
                "created_at": {"DATA_TYPE": "datetime", "IS_NULLABLE": "YES"}
            }
        },
        "empty_table": {
            "columns": {}
        },
        "orders": {
            "columns": {
                "uuid": {
                    "DATA_TYPE": "char",
                    "IS_NULLABLE": "NO",
                    "COLUMN_KEY": "PRI",
                    "COLUMN_COMMENT": "{\"typeClass\": \"Ramsey\\\\Uuid\\\\UuidInterface\"}"
                },
                "total": {"DATA_TYPE": "decimal", "IS_NULLABLE": "NO", "COLUMN_DEFAULT": "0"}
            }
        }
    }
}"#;

const GROUPED_SCHEMA: &str = r#"{
    "databaseTable": "articles",
    "databaseTableId": "id",
    "databaseCols": {
        "ro": {
            "id": {"type": "int", "nullable": false}
        },
        "rw": {
            "title": {"type": "varchar", "nullable": false, "maxLength": 120},
            "body": {"type": "text", "nullbale": true}
        }
    }
}"#;

fn write_schema(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn config(schema: &Path, output: &Path) -> CodegenConfig {
    CodegenConfig {
        output_dir: output.to_path_buf(),
        ignored_namespace: "App\\Model".to_string(),
        ..CodegenConfig::default_with_schema(schema.to_path_buf())
    }
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

#[test]
fn test_catalog_schema_generates_every_artifact() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json", CATALOG_SCHEMA);
    let out = dir.path().join("model");

    let report = generate(&config(&schema, &out)).unwrap();

    assert_eq!(report.tables, vec!["users", "orders"]);
    assert_eq!(report.files.len(), 6);
    assert_eq!(report.written(), 6);
    assert!(!report.has_errors());

    let users = read(out.join("Users/Data/UsersData.php"));
    assert!(users.contains("namespace App\\Model\\Users\\Data;\n"));
    assert!(users.contains("class UsersData implements IDatabaseData\n"));
    assert!(users.contains("\t\tprotected ?\\DateTimeInterface $createdAt = null,\n"));

    let orders = read(out.join("Orders/Data/OrdersData.php"));
    assert!(orders.contains("use Ramsey\\Uuid\\Uuid;\n"));
    assert!(orders.contains("\t\tprotected UuidInterface $uuid,\n"));

    let collection = read(out.join("Orders/Collection/OrdersCollection.php"));
    assert!(collection.contains("\tprotected string $idFieldSerializer = '->toString()';\n"));

    let storage = read(out.join("Users/Storage/UsersDatabaseLowLevelStorage.php"));
    assert!(storage.contains("\tprotected string $tableName = 'users';\n"));
    assert!(storage.contains("\tprotected ?string $idField = 'id';\n"));

    assert!(!out.join("Phinxlog").exists());
    assert!(!out.join("EmptyTable").exists());
}

#[test]
fn test_grouped_schema_with_single_artifact() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "articles.json", GROUPED_SCHEMA);
    let out = dir.path().join("model");

    let report = GeneratorBuilder::new(&schema)
        .output_dir(&out)
        .ignored_namespace("App\\Model")
        .artifacts(&[ArtifactKind::Data])
        .generate()
        .unwrap();

    assert_eq!(report.tables, vec!["articles"]);
    assert_eq!(report.written(), 1);

    let data = read(out.join("Articles/Data/ArticlesData.php"));
    assert!(data.contains("\tprotected int $id;\n"));
    assert!(data.contains("\t\tprotected string $title,\n"));
    assert!(data.contains("\t\tprotected ?string $body = null,\n"));
    assert!(!out.join("Articles/Storage").exists());
}

#[test]
fn test_toml_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        &dir,
        "schema.toml",
        r#"
            [tables.tags.columns.id]
            DATA_TYPE = "int"
            IS_NULLABLE = "NO"
            COLUMN_KEY = "PRI"

            [tables.tags.columns.label]
            DATA_TYPE = "varchar"
            IS_NULLABLE = "YES"
        "#,
    );
    let out = dir.path().join("model");

    let report = generate(&config(&schema, &out)).unwrap();
    assert_eq!(report.tables, vec!["tags"]);
    assert!(out.join("Tags/Data/TagsData.php").exists());
}

#[test]
fn test_single_table_selection() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json", CATALOG_SCHEMA);
    let out = dir.path().join("model");

    let report = GeneratorBuilder::new(&schema)
        .output_dir(&out)
        .ignored_namespace("App\\Model")
        .table("orders")
        .generate()
        .unwrap();

    assert_eq!(report.tables, vec!["orders"]);
    assert_eq!(report.written(), 3);
    assert!(!out.join("Users").exists());
}

#[test]
fn test_unknown_table_is_fatal() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json", CATALOG_SCHEMA);
    let out = dir.path().join("model");

    let err = GeneratorBuilder::new(&schema)
        .output_dir(&out)
        .table("invoices")
        .generate()
        .unwrap_err();

    assert!(matches!(err, CodegenError::TableNotFound { ref table, .. } if table == "invoices"));
    assert!(!out.exists());
}

#[test]
fn test_schema_without_tables_is_fatal() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        &dir,
        "schema.json",
        r#"{"phinxlog": {"columns": {"version": {"DATA_TYPE": "bigint"}}}}"#,
    );

    let err = generate(&config(&schema, &dir.path().join("model"))).unwrap_err();
    assert!(matches!(err, CodegenError::NoTables));
}

#[test]
fn test_missing_schema_fails_validation() {
    let dir = TempDir::new().unwrap();
    let err = generate(&config(
        &dir.path().join("missing.json"),
        &dir.path().join("model"),
    ))
    .unwrap_err();
    assert!(matches!(err, CodegenError::ValidationError(_)));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json", CATALOG_SCHEMA);
    let out = dir.path().join("model");

    let report = GeneratorBuilder::new(&schema)
        .output_dir(&out)
        .dry_run()
        .generate()
        .unwrap();

    assert_eq!(report.files.len(), 6);
    assert_eq!(report.written(), 0);
    assert!(report
        .files
        .iter()
        .all(|f| matches!(f, WriteOutcome::Ready(_))));
    assert!(!out.exists());
}

#[test]
fn test_existing_files_need_force() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json", CATALOG_SCHEMA);
    let out = dir.path().join("model");
    let base = config(&schema, &out);

    let first = generate(&base).unwrap();
    assert_eq!(first.written(), 6);

    let data_file = out.join("Users/Data/UsersData.php");
    fs::write(&data_file, "<?php // edited\n").unwrap();

    let second = generate(&base).unwrap();
    assert_eq!(second.written(), 0);
    assert_eq!(second.errors.len(), 6);
    assert!(second.errors[0].contains("Use force (--force|-f)"));
    assert_eq!(read(data_file.clone()), "<?php // edited\n");

    let forced = generate(&CodegenConfig {
        force: true,
        ..base
    })
    .unwrap();
    assert_eq!(forced.written(), 6);
    assert!(forced
        .files
        .iter()
        .all(|f| matches!(f, WriteOutcome::Overwritten(_))));
    assert!(read(data_file).contains("class UsersData"));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json", CATALOG_SCHEMA);
    let first_out = dir.path().join("first");
    let second_out = dir.path().join("second");

    generate(&config(&schema, &first_out)).unwrap();
    generate(&config(&schema, &second_out)).unwrap();

    for file in [
        "Users/Data/UsersData.php",
        "Users/Collection/UsersCollection.php",
        "Orders/Storage/OrdersDatabaseLowLevelStorage.php",
    ] {
        assert_eq!(read(first_out.join(file)), read(second_out.join(file)));
    }
}

#[test]
fn test_meta_overlay_overrides_comments() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json", CATALOG_SCHEMA);
    let meta = write_schema(
        &dir,
        "meta.json",
        r#"{"users": {"email": {"readonly": true}}}"#,
    );
    let out = dir.path().join("model");

    let report = GeneratorBuilder::new(&schema)
        .output_dir(&out)
        .ignored_namespace("App\\Model")
        .meta_file(&meta)
        .artifacts(&[ArtifactKind::Data])
        .generate()
        .unwrap();
    assert_eq!(report.written(), 2);

    let users = read(out.join("Users/Data/UsersData.php"));
    assert!(users.contains("\tprotected string $email;\n"));

    // The overlay replaces comments, so the uuid column loses its value object
    let orders = read(out.join("Orders/Data/OrdersData.php"));
    assert!(orders.contains("\t\tprotected string $uuid,\n"));
}

#[test]
fn test_missing_meta_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json", CATALOG_SCHEMA);

    let report = GeneratorBuilder::new(&schema)
        .output_dir(dir.path().join("model"))
        .meta_file(dir.path().join("meta.json"))
        .generate()
        .unwrap();
    assert_eq!(report.written(), 6);
}
