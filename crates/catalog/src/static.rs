// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static Catalog
//!
//! This module provides a schema source backed by predefined metadata, either
//! assembled in code or read from a table definition document:
//!
//! ```json
//! {
//!   "tables": {
//!     "collars": { "hole_id": "Integer", "easting": "Double" },
//!     "assays":  { "hole_id": "Integer", "au_ppm": "Float" }
//!   }
//! }
//! ```
//!
//! Column types use the config names listed in [`gdt_ir::metadata::SUPPORTED_TYPES`].
//! Table and column order follow the document. A table or column named twice
//! is rejected rather than overwritten.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use gdt_ir::{ColumnMetadata, DataType, TableMetadata};
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::{CatalogError, CatalogResult, SchemaSource, TableHandle};

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    tables: Entries<Entries<String>>,
}

/// Map entries in document order, repeated keys included
#[derive(Debug)]
struct Entries<V>(Vec<(String, V)>);

impl<V> Entries<V> {
    fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.0
            .iter()
            .map(|(key, _)| key.as_str())
            .find(|key| !seen.insert(*key))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// Static catalog with predefined schema data
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tables: IndexMap<String, TableMetadata>,
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.add_table(table);
        self
    }

    /// Add a table, replacing any table of the same name
    pub fn add_table(&mut self, table: TableMetadata) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Tables in definition order
    pub fn tables(&self) -> impl Iterator<Item = &TableMetadata> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Parse a JSON table definition document
    pub fn from_json_str(content: &str) -> CatalogResult<Self> {
        let document: SchemaDocument = serde_json::from_str(content)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
        Self::from_document(document)
    }

    /// Parse a YAML table definition document
    pub fn from_yaml_str(content: &str) -> CatalogResult<Self> {
        let document: SchemaDocument = serde_yaml::from_str(content)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
        Self::from_document(document)
    }

    /// Load a table definition document, choosing the format by extension
    /// (`.json`, `.yaml` or `.yml`)
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::SerializationError(format!("{}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Err(CatalogError::ConfigurationError(format!(
                "{}: expected a .json, .yaml or .yml file",
                path.display()
            ))),
        }
    }

    fn from_document(document: SchemaDocument) -> CatalogResult<Self> {
        if let Some(key) = document.tables.first_duplicate() {
            return Err(CatalogError::DuplicateKey {
                key: key.to_string(),
                scope: "tables".to_string(),
            });
        }

        let mut catalog = Self::new();
        for (table_name, columns) in document.tables.0 {
            if let Some(key) = columns.first_duplicate() {
                return Err(CatalogError::DuplicateKey {
                    key: key.to_string(),
                    scope: format!("tables.{table_name}"),
                });
            }

            let mut table = TableMetadata::new(table_name.clone());
            for (column_name, type_name) in columns.0 {
                let data_type: DataType =
                    type_name
                        .parse()
                        .map_err(|_| CatalogError::UnsupportedType {
                            table: table_name.clone(),
                            column: column_name.clone(),
                            type_name: type_name.clone(),
                        })?;
                table = table.with_column(ColumnMetadata::new(column_name, data_type));
            }
            catalog.add_table(table);
        }
        debug!(tables = catalog.len(), "Loaded static catalog");
        Ok(catalog)
    }
}

impl SchemaSource for StaticCatalog {
    fn get_table(&self, name: &str) -> CatalogResult<TableHandle> {
        self.tables
            .get(name)
            .cloned()
            .map(TableHandle::new)
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    fn list_tables(&self) -> CatalogResult<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_table() {
        let catalog = StaticCatalog::new()
            .with_table(TableMetadata::new("t1").with_column(ColumnMetadata::new("c2", DataType::Text)));

        let handle = catalog.get_table("t1").unwrap();
        assert_eq!(handle.column_names(), vec!["c2"]);
        assert_eq!(
            catalog.get_table("t9"),
            Err(CatalogError::TableNotFound("t9".to_string()))
        );
    }

    #[test]
    fn test_json_document_keeps_order() {
        let catalog = StaticCatalog::from_json_str(
            r#"{"tables": {"zeta": {"b": "Integer", "a": "String"}, "alpha": {"x": "Float"}}}"#,
        )
        .unwrap();

        assert_eq!(catalog.list_tables().unwrap(), vec!["zeta", "alpha"]);
        let zeta = catalog.get_table("zeta").unwrap();
        assert_eq!(zeta.column_names(), vec!["b", "a"]);
        assert_eq!(
            zeta.metadata().get_column("a").unwrap().data_type,
            DataType::Varchar(None)
        );
    }

    #[test]
    fn test_yaml_document() {
        let catalog = StaticCatalog::from_yaml_str(
            "tables:\n  collars:\n    hole_id: Integer\n    drilled: DateTime\n",
        )
        .unwrap();
        let collars = catalog.get_table("collars").unwrap();
        assert_eq!(collars.column_names(), vec!["hole_id", "drilled"]);
    }

    #[test]
    fn test_unsupported_type_names_the_column() {
        let err = StaticCatalog::from_json_str(
            r#"{"tables": {"table1": {"valid_integer_col": "Integer", "unknown_type_col": "UnknownType"}}}"#,
        )
        .unwrap_err();

        assert_eq!(
            err,
            CatalogError::UnsupportedType {
                table: "table1".to_string(),
                column: "unknown_type_col".to_string(),
                type_name: "UnknownType".to_string(),
            }
        );
    }

    #[test]
    fn test_repeated_table_is_rejected() {
        let err = StaticCatalog::from_json_str(
            r#"{"tables": {"t": {"a": "Integer"}, "t": {"b": "Integer"}}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateKey {
                key: "t".to_string(),
                scope: "tables".to_string(),
            }
        );
        assert!(!err.is_connectivity());
    }

    #[test]
    fn test_repeated_column_is_rejected() {
        let err = StaticCatalog::from_json_str(
            r#"{"tables": {"collars": {"hole_id": "Integer", "depth": "Float", "hole_id": "String"}}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateKey {
                key: "hole_id".to_string(),
                scope: "tables.collars".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Duplicate key 'hole_id' in tables.collars");
    }

    #[test]
    fn test_repeated_yaml_key_is_rejected() {
        let result = StaticCatalog::from_yaml_str("tables:\n  t:\n    a: Integer\n    a: Float\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_tables_key() {
        let err = StaticCatalog::from_json_str(r#"{"table1": {"a": "Integer"}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::SerializationError(_)));
    }
}
