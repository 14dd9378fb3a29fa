// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Table/Alias Resolution
//!
//! Looks up every table a config refers to and applies alias substitution.
//!
//! Resolution order is fixed so that error ordering is reproducible:
//!
//! 1. Selection tables, in selection order
//! 2. Join targets not yet resolved, in join order
//! 3. Alias keys naming no table from steps 1-2 (existence check only)
//!
//! An aliased table is stored under its alias and every lookup by the
//! original name lands on the aliased handle. Handles live for one build.

use gdt_catalog::{CatalogError, SchemaSource, TableHandle};
use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::config::{AliasMap, JoinSpec, Selection};
use crate::error::{Endpoint, Location, ResolutionError, StatementError, StatementResult};

/// Resolved handles keyed by the name the statement refers to them by
#[derive(Debug, Clone, Default)]
pub struct ResolvedTables {
    tables: IndexMap<String, TableHandle>,
}

impl ResolvedTables {
    /// Handle for a config table name, after alias substitution
    pub fn lookup(&self, table: &str, aliases: &AliasMap) -> Option<&TableHandle> {
        let key = aliases.get(table).map(String::as_str).unwrap_or(table);
        self.tables.get(key)
    }

    /// Handle stored under a display name (alias or table name)
    pub fn get(&self, display_name: &str) -> Option<&TableHandle> {
        self.tables.get(display_name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Display names in resolution order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    fn resolve<S: SchemaSource + ?Sized>(
        &mut self,
        source: &S,
        table: &str,
        aliases: &AliasMap,
        location: Location,
    ) -> StatementResult<()> {
        if self.lookup(table, aliases).is_some() {
            return Ok(());
        }

        let handle = source
            .get_table(table)
            .map_err(|e| lookup_error(e, table, location))?;
        let handle = match aliases.get(table) {
            Some(alias) => handle.aliased(alias.clone()),
            None => handle,
        };

        debug!(table, display_name = handle.display_name(), "Resolved table");
        self.tables.insert(handle.display_name().to_string(), handle);
        Ok(())
    }
}

fn lookup_error(err: CatalogError, table: &str, location: Location) -> StatementError {
    match err {
        CatalogError::TableNotFound(_) => ResolutionError::MissingTable {
            table: table.to_string(),
            location,
        }
        .into(),
        other if other.is_connectivity() => StatementError::Connectivity {
            table: table.to_string(),
            source: other,
        },
        other => StatementError::Schema {
            table: table.to_string(),
            source: other,
        },
    }
}

/// Resolve every selection table, substituting aliased handles
#[instrument(skip_all, fields(tables = selection.len()))]
pub fn resolve_tables<S: SchemaSource + ?Sized>(
    selection: &Selection,
    aliases: &AliasMap,
    source: &S,
) -> StatementResult<ResolvedTables> {
    let mut resolved = ResolvedTables::default();
    for table in selection.keys() {
        resolved.resolve(source, table, aliases, Location::Selection)?;
    }
    Ok(resolved)
}

/// Resolve selection tables, then join targets, then check unused alias keys
pub fn resolve_all<S: SchemaSource + ?Sized>(
    selection: &Selection,
    joins: &[JoinSpec],
    aliases: &AliasMap,
    source: &S,
) -> StatementResult<ResolvedTables> {
    let mut resolved = resolve_tables(selection, aliases, source)?;

    for (index, join) in joins.iter().enumerate() {
        let location = Location::join(index, Endpoint::Target);
        resolved.resolve(source, &join.target, aliases, location)?;
    }

    for table in aliases.keys() {
        if resolved.lookup(table, aliases).is_none() {
            source
                .get_table(table)
                .map_err(|e| lookup_error(e, table, Location::Aliases))?;
        }
    }

    Ok(resolved)
}
