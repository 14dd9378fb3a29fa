// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for the catalog crate

use std::fs;

use gdt_catalog::{CatalogError, CatalogResult, SchemaSource, StaticCatalog, TableHandle};
use gdt_ir::{ColumnMetadata, DataType, TableMetadata};

// Schema source that is never reachable
struct OfflineSource;

impl SchemaSource for OfflineSource {
    fn get_table(&self, _name: &str) -> CatalogResult<TableHandle> {
        Err(CatalogError::ConnectionFailed("network unreachable".to_string()))
    }

    fn list_tables(&self) -> CatalogResult<Vec<String>> {
        Err(CatalogError::ConnectionFailed("network unreachable".to_string()))
    }
}

fn lookup(source: &dyn SchemaSource, name: &str) -> CatalogResult<TableHandle> {
    source.get_table(name)
}

#[test]
fn test_trait_objects_and_references() {
    let catalog = StaticCatalog::new().with_table(
        TableMetadata::new("collars")
            .with_column(ColumnMetadata::new("hole_id", DataType::Integer).with_primary_key()),
    );

    let handle = lookup(&catalog, "collars").unwrap();
    assert_eq!(catalog.get_columns(&handle), vec!["hole_id"]);

    let by_ref = &catalog;
    assert_eq!(by_ref.list_tables().unwrap(), vec!["collars"]);

    let err = lookup(&OfflineSource, "collars").unwrap_err();
    assert!(err.is_connectivity());
}

#[test]
fn test_load_from_files() {
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("schema.json");
    fs::write(
        &json_path,
        r#"{"tables": {"table_1": {"table_1_col_1": "Integer", "table_1_col_2": "String"}}}"#,
    )
    .unwrap();
    let from_json = StaticCatalog::from_path(&json_path).unwrap();
    assert_eq!(from_json.len(), 1);

    let yaml_path = dir.path().join("schema.yml");
    fs::write(&yaml_path, "tables:\n  table_1:\n    table_1_col_1: Integer\n").unwrap();
    let from_yaml = StaticCatalog::from_path(&yaml_path).unwrap();
    assert_eq!(
        from_yaml.get_table("table_1").unwrap().column_names(),
        vec!["table_1_col_1"]
    );
}

#[test]
fn test_load_rejects_unknown_extension_and_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let txt_path = dir.path().join("schema.txt");
    fs::write(&txt_path, "{}").unwrap();
    assert!(matches!(
        StaticCatalog::from_path(&txt_path),
        Err(CatalogError::ConfigurationError(_))
    ));

    assert!(matches!(
        StaticCatalog::from_path(dir.path().join("absent.json")),
        Err(CatalogError::SerializationError(_))
    ));
}
