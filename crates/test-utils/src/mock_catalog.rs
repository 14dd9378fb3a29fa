// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock schema source for testing
//!
//! Provides an in-memory schema source with builder pattern for easy test setup.
//! Every `get_table` call is recorded, so tests can assert on resolution order
//! or on the absence of any schema access. Outages can be simulated for the
//! whole source or for single tables.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use gdt_catalog::{CatalogError, CatalogResult, SchemaSource, TableHandle};
use gdt_ir::{ColumnMetadata, DataType, TableMetadata};
use indexmap::IndexMap;

/// In-memory mock schema source for testing
#[derive(Debug, Default)]
pub struct MockCatalog {
    tables: IndexMap<String, TableMetadata>,
    unreachable: Option<String>,
    broken_tables: HashMap<String, String>,
    lookups: Mutex<Vec<String>>,
}

impl MockCatalog {
    /// Create a new empty mock catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the catalog
    pub fn add_table(mut self, table: TableMetadata) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    /// Drop a table, simulating schema drift between builds
    pub fn remove_table(&mut self, name: &str) -> Option<TableMetadata> {
        self.tables.shift_remove(name)
    }

    /// Table names passed to `get_table`, in call order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn clear_lookups(&self) {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl SchemaSource for MockCatalog {
    fn get_table(&self, name: &str) -> CatalogResult<TableHandle> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.to_string());

        if let Some(reason) = &self.unreachable {
            return Err(CatalogError::ConnectionFailed(reason.clone()));
        }
        if let Some(reason) = self.broken_tables.get(name) {
            return Err(CatalogError::QueryFailed(reason.clone()));
        }

        self.tables
            .get(name)
            .cloned()
            .map(TableHandle::new)
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    fn list_tables(&self) -> CatalogResult<Vec<String>> {
        match &self.unreachable {
            Some(reason) => Err(CatalogError::ConnectionFailed(reason.clone())),
            None => Ok(self.tables.keys().cloned().collect()),
        }
    }
}

/// Builder for creating mock catalogs with a fluent API
#[derive(Debug, Default)]
pub struct MockCatalogBuilder {
    catalog: MockCatalog,
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the standard test schema: `table_1`, `table_2` and a small drillhole
    /// set (`collars`, `surveys`, `assays`)
    pub fn with_standard_schema(self) -> Self {
        self.with_columns("table_1", &["table_1_col_1", "table_1_col_2"])
            .with_columns("table_2", &["table_2_col_1", "table_2_col_2"])
            .with_table(
                TableMetadata::new("collars").with_columns(vec![
                    ColumnMetadata::new("hole_id", DataType::Varchar(Some(32))).with_primary_key(),
                    ColumnMetadata::new("easting", DataType::Double),
                    ColumnMetadata::new("northing", DataType::Double),
                    ColumnMetadata::new("drilled_at", DataType::DateTime),
                ]),
            )
            .with_table(
                TableMetadata::new("surveys").with_columns(vec![
                    ColumnMetadata::new("hole_id", DataType::Varchar(Some(32))).with_nullable(false),
                    ColumnMetadata::new("depth", DataType::Float),
                    ColumnMetadata::new("azimuth", DataType::Float),
                    ColumnMetadata::new("dip", DataType::Float),
                ]),
            )
            .with_table(
                TableMetadata::new("assays").with_columns(vec![
                    ColumnMetadata::new("sample_id", DataType::Integer).with_primary_key(),
                    ColumnMetadata::new("hole_id", DataType::Varchar(Some(32))).with_nullable(false),
                    ColumnMetadata::new("from_m", DataType::Float),
                    ColumnMetadata::new("to_m", DataType::Float),
                    ColumnMetadata::new("au_ppm", DataType::Float),
                ]),
            )
    }

    /// Add a custom table
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.catalog = self.catalog.add_table(table);
        self
    }

    /// Add a table of integer columns
    pub fn with_columns(self, table: &str, columns: &[&str]) -> Self {
        let columns = columns
            .iter()
            .map(|c| ColumnMetadata::new(*c, DataType::Integer))
            .collect();
        self.with_table(TableMetadata::new(table).with_columns(columns))
    }

    /// Fail every lookup as if the database could not be reached
    pub fn unreachable(mut self, reason: impl Into<String>) -> Self {
        self.catalog.unreachable = Some(reason.into());
        self
    }

    /// Fail lookups of one table as if the driver errored while reflecting it
    pub fn with_broken_table(mut self, table: impl Into<String>, reason: impl Into<String>) -> Self {
        self.catalog.broken_tables.insert(table.into(), reason.into());
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_catalog_list_tables() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();

        let tables = catalog.list_tables().unwrap();
        assert_eq!(
            tables,
            vec!["table_1", "table_2", "collars", "surveys", "assays"]
        );
    }

    #[test]
    fn test_mock_catalog_records_lookups() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();

        let handle = catalog.get_table("assays").unwrap();
        assert_eq!(handle.column_names().len(), 5);
        assert!(catalog.get_table("missing").is_err());

        assert_eq!(catalog.lookups(), vec!["assays", "missing"]);
        catalog.clear_lookups();
        assert_eq!(catalog.lookup_count(), 0);
    }

    #[test]
    fn test_unreachable_catalog() {
        let catalog = MockCatalogBuilder::new()
            .with_standard_schema()
            .unreachable("VPN down")
            .build();

        let err = catalog.get_table("collars").unwrap_err();
        assert_eq!(err, CatalogError::ConnectionFailed("VPN down".to_string()));
        assert!(catalog.list_tables().is_err());
    }

    #[test]
    fn test_broken_table() {
        let catalog = MockCatalogBuilder::new()
            .with_standard_schema()
            .with_broken_table("surveys", "driver not installed")
            .build();

        assert!(catalog.get_table("collars").is_ok());
        assert!(catalog.get_table("surveys").unwrap_err().is_connectivity());
    }

    #[test]
    fn test_remove_table() {
        let mut catalog = MockCatalogBuilder::new().with_standard_schema().build();
        assert!(catalog.remove_table("table_2").is_some());
        assert_eq!(
            catalog.get_table("table_2").unwrap_err(),
            CatalogError::TableNotFound("table_2".to_string())
        );
    }
}
