// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema source trait
//!
//! This module defines the blocking interface the statement builder uses to
//! look up tables. Calls are synchronous; an implementation backed by a live
//! connection blocks until reflection completes or fails.

use crate::error::CatalogResult;
use crate::handle::TableHandle;

/// Schema source abstraction
///
/// Implementations can reflect a live database, read from definition files, or
/// serve canned metadata in tests. Lookups are read-only, so a source shared
/// between threads only needs to be `Sync`.
///
/// # Examples
///
/// ```rust
/// use gdt_catalog::{CatalogResult, SchemaSource};
///
/// fn widest_table(source: &impl SchemaSource) -> CatalogResult<Option<String>> {
///     let mut widest = None;
///     let mut width = 0;
///     for name in source.list_tables()? {
///         let handle = source.get_table(&name)?;
///         if handle.column_names().len() > width {
///             width = handle.column_names().len();
///             widest = Some(name);
///         }
///     }
///     Ok(widest)
/// }
/// ```
pub trait SchemaSource {
    /// Get a handle on a table by its exact name
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TableNotFound` if the table doesn't exist.
    /// Returns `CatalogError::ConnectionFailed` or `CatalogError::QueryFailed`
    /// if the source could not be reached.
    fn get_table(&self, name: &str) -> CatalogResult<TableHandle>;

    /// Names of every table the source knows about
    fn list_tables(&self) -> CatalogResult<Vec<String>>;

    /// Ordered column names of a resolved handle
    fn get_columns<'h>(&self, handle: &'h TableHandle) -> Vec<&'h str> {
        handle.column_names()
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for &T {
    fn get_table(&self, name: &str) -> CatalogResult<TableHandle> {
        (**self).get_table(name)
    }

    fn list_tables(&self) -> CatalogResult<Vec<String>> {
        (**self).list_tables()
    }

    fn get_columns<'h>(&self, handle: &'h TableHandle) -> Vec<&'h str> {
        (**self).get_columns(handle)
    }
}
