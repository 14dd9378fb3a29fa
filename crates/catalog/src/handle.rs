// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Table handles
//!
//! A [`TableHandle`] is what a [`SchemaSource`](crate::SchemaSource) hands out
//! for a table name. It is either the canonical table or an aliased view of
//! it; in the aliased case every column reference and FROM item it produces
//! goes through the alias.

use gdt_ir::{ColumnRef, TableMetadata, TableRef};

/// A schema-backed table, optionally viewed through an alias
#[derive(Debug, Clone, PartialEq)]
pub struct TableHandle {
    metadata: TableMetadata,
    alias: Option<String>,
}

impl TableHandle {
    pub fn new(metadata: TableMetadata) -> Self {
        Self {
            metadata,
            alias: None,
        }
    }

    /// View this table through `alias`
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Table name as the engine knows it
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Name the statement refers to this table by
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.metadata.name)
    }

    pub fn is_aliased(&self) -> bool {
        self.alias.is_some()
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.metadata.column_names()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.metadata.get_column(column).is_some()
    }

    /// Reference to `column` qualified by [`display_name`](Self::display_name),
    /// or `None` if the table has no such column
    pub fn column(&self, column: &str) -> Option<ColumnRef> {
        self.metadata
            .get_column(column)
            .map(|c| ColumnRef::new(c.name.clone()).with_table(self.display_name()))
    }

    /// FROM item for this table (`name` or `name AS alias`)
    pub fn table_ref(&self) -> TableRef {
        let table = TableRef::new(self.metadata.name.clone());
        match &self.alias {
            Some(alias) => table.with_alias(alias.clone()),
            None => table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdt_ir::{ColumnMetadata, DataType};

    fn samples() -> TableMetadata {
        TableMetadata::new("samples")
            .with_column(ColumnMetadata::new("sample_id", DataType::Integer))
            .with_column(ColumnMetadata::new("hole_id", DataType::Integer))
    }

    #[test]
    fn test_canonical_handle() {
        let handle = TableHandle::new(samples());
        assert_eq!(handle.display_name(), "samples");
        assert!(!handle.is_aliased());
        assert_eq!(handle.column("hole_id").unwrap().qualified(), "samples.hole_id");
        assert_eq!(handle.table_ref().to_string(), "samples");
    }

    #[test]
    fn test_aliased_handle_uses_alias_everywhere() {
        let handle = TableHandle::new(samples()).aliased("s");
        assert_eq!(handle.name(), "samples");
        assert_eq!(handle.alias(), Some("s"));
        assert_eq!(handle.display_name(), "s");
        assert_eq!(handle.column("sample_id").unwrap().to_string(), "s.sample_id");
        assert_eq!(handle.table_ref().to_string(), "samples AS s");
    }

    #[test]
    fn test_missing_column() {
        let handle = TableHandle::new(samples());
        assert!(handle.column("depth").is_none());
        assert!(!handle.has_column("depth"));
        assert_eq!(handle.column_names(), vec!["sample_id", "hole_id"]);
    }
}
