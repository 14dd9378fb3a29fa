// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Geo Digital Tools - Statement Builder
//!
//! Builds a SELECT statement from a declarative config:
//!
//! ```text
//! config document ──parse──▶ StatementConfig
//!                                  │
//!            SchemaSource ──▶ resolve tables (aliases applied)
//!                                  │
//!                            project columns ──▶ apply joins in order ──▶ SelectStatement
//! ```
//!
//! Every step is synchronous and nothing is cached between calls: each build
//! re-resolves its tables, so schema changes between builds are always seen.
//! Any failure aborts the build; no partial statement is returned.
//!
//! ## Usage
//!
//! ```rust
//! use gdt_catalog::StaticCatalog;
//! use gdt_ir::{ColumnMetadata, DataType, TableMetadata};
//! use serde_json::json;
//!
//! let catalog = StaticCatalog::new()
//!     .with_table(TableMetadata::new("t1").with_column(ColumnMetadata::new("a", DataType::Integer)))
//!     .with_table(TableMetadata::new("t2").with_column(ColumnMetadata::new("b", DataType::Integer)));
//!
//! let config = gdt_statement::parse(&json!({
//!     "statement_configs": {
//!         "selection": {"t1": ["a"], "t2": ["b"]},
//!         "joins": [{"t2": [["t2", "b"], ["t1", "a"]]}]
//!     }
//! }))
//! .unwrap();
//!
//! let statement = config.build(&catalog).unwrap();
//! assert_eq!(statement.to_string(), "SELECT t1.a, t2.b FROM t1 JOIN t2 ON t2.b = t1.a");
//! ```

use std::path::Path;

use gdt_catalog::SchemaSource;
use gdt_ir::SelectStatement;
use tracing::{debug, instrument};

pub mod assembler;
pub mod config;
pub mod error;
pub mod resolver;

pub use config::{
    AliasMap, CONFIG_KEY, ColumnEndpoint, JoinSpec, Selection, StatementConfig, parse,
};
pub use error::{
    ConfigError, ConfigResult, Endpoint, Location, ResolutionError, StatementError,
    StatementResult,
};
pub use resolver::{ResolvedTables, resolve_all, resolve_tables};

/// Build a statement from its parts against `source`
///
/// Config rules are checked before the schema source is touched.
#[instrument(skip_all, fields(tables = selection.len(), joins = joins.len()))]
pub fn build<S: SchemaSource + ?Sized>(
    source: &S,
    selection: &Selection,
    joins: &[JoinSpec],
    aliases: &AliasMap,
) -> StatementResult<SelectStatement> {
    config::validate(selection, joins, aliases)?;

    let resolved = resolver::resolve_all(selection, joins, aliases, source)?;
    let statement = assembler::assemble(selection, joins, aliases, &resolved)?;

    debug!(sql = %statement, "Built statement");
    Ok(statement)
}

impl StatementConfig {
    /// Build this config's statement against `source`
    pub fn build<S: SchemaSource + ?Sized>(&self, source: &S) -> StatementResult<SelectStatement> {
        build(source, &self.selection, &self.joins, &self.aliases)
    }
}

/// Parse the config file at `config_path` and build its statement
#[instrument(skip_all, fields(path = %config_path.as_ref().display()))]
pub fn load_and_build<S: SchemaSource + ?Sized>(
    config_path: impl AsRef<Path>,
    source: &S,
) -> StatementResult<SelectStatement> {
    let config = StatementConfig::from_path(config_path.as_ref())?;
    config.build(source)
}
