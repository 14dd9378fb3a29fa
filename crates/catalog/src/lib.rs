// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Geo Digital Tools - Catalog Layer
//!
//! This crate provides the schema abstraction the statement builder resolves
//! table names against.
//!
//! - [`SchemaSource`]: "given a table name, hand back its handle or fail"
//! - [`TableHandle`]: a table's metadata, optionally viewed through an alias
//! - [`StaticCatalog`]: schema held in memory or loaded from a definition file
//!
//! Live engines implement [`SchemaSource`] by reflecting their own catalog
//! (see the `gdt-database` crate).
//!
//! ## Usage
//!
//! ```rust
//! use gdt_catalog::{SchemaSource, StaticCatalog};
//! use gdt_ir::{ColumnMetadata, DataType, TableMetadata};
//!
//! let catalog = StaticCatalog::new().with_table(
//!     TableMetadata::new("collars")
//!         .with_column(ColumnMetadata::new("hole_id", DataType::Integer)),
//! );
//!
//! let handle = catalog.get_table("collars").unwrap().aliased("c");
//! assert_eq!(handle.display_name(), "c");
//! assert_eq!(handle.column("hole_id").unwrap().to_string(), "c.hole_id");
//! ```

pub mod error;
pub mod handle;
pub mod r#static;
pub mod r#trait;

// Re-exports
pub use error::{CatalogError, CatalogResult};
pub use gdt_ir::{ColumnMetadata, DataType, TableMetadata};
pub use handle::TableHandle;
pub use r#static::StaticCatalog;
pub use r#trait::SchemaSource;
