// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement Assembly
//!
//! Builds the [`SelectStatement`] from resolved handles in a single pass:
//!
//! 1. **Projection**: walk the selection table by table, column by column,
//!    resolving each column on its (possibly aliased) handle. Repeated columns
//!    are kept.
//! 2. **FROM root**: the first selected table that no join targets, or the
//!    first selected table if every one of them is a join target.
//! 3. **Joins**: applied onto the root in list order, each contributing one
//!    `left = right` predicate. Duplicate targets give duplicate clauses.
//! 4. **Remaining tables**: selected tables that are neither the root nor a
//!    join target become further FROM items, in selection order.
//!
//! A join endpoint may only name a table already in the join chain when the
//! join is applied: the root, or the target of this or an earlier join. The
//! extra FROM items come after the chain, so no join condition can see them.

use std::collections::HashSet;

use gdt_catalog::TableHandle;
use gdt_ir::{ColumnRef, Expr, Join, SelectStatement};
use tracing::debug;

use crate::config::{AliasMap, ColumnEndpoint, JoinSpec, Selection};
use crate::error::{ConfigError, Endpoint, Location, ResolutionError, StatementResult};
use crate::resolver::ResolvedTables;

fn table_handle<'r>(
    resolved: &'r ResolvedTables,
    table: &str,
    aliases: &AliasMap,
    location: Location,
) -> Result<&'r TableHandle, ResolutionError> {
    resolved
        .lookup(table, aliases)
        .ok_or_else(|| ResolutionError::MissingTable {
            table: table.to_string(),
            location,
        })
}

fn resolve_column(
    handle: &TableHandle,
    table: &str,
    column: &str,
    location: Location,
) -> Result<ColumnRef, ResolutionError> {
    handle
        .column(column)
        .ok_or_else(|| ResolutionError::MissingColumn {
            column: column.to_string(),
            table: table.to_string(),
            available: handle.column_names().into_iter().map(String::from).collect(),
            location,
        })
}

fn resolve_endpoint(
    resolved: &ResolvedTables,
    aliases: &AliasMap,
    in_scope: &HashSet<&str>,
    endpoint: &ColumnEndpoint,
    location: Location,
) -> Result<ColumnRef, ResolutionError> {
    if !in_scope.contains(endpoint.table.as_str()) {
        return Err(ResolutionError::NotInStatement {
            table: endpoint.table.clone(),
            location,
        });
    }
    let handle = table_handle(resolved, &endpoint.table, aliases, location)?;
    resolve_column(handle, &endpoint.table, &endpoint.column, location)
}

/// Projection over the selection, in selection order
pub fn project(
    selection: &Selection,
    aliases: &AliasMap,
    resolved: &ResolvedTables,
) -> StatementResult<Vec<ColumnRef>> {
    let mut projection = Vec::new();
    for (table, columns) in selection {
        let handle = table_handle(resolved, table, aliases, Location::Selection)?;
        for name in columns {
            projection.push(resolve_column(handle, table, name, Location::Selection)?);
        }
    }

    if projection.is_empty() {
        return Err(ConfigError::EmptyProjection.into());
    }
    Ok(projection)
}

/// Assemble the full statement from already-resolved tables
pub fn assemble(
    selection: &Selection,
    joins: &[JoinSpec],
    aliases: &AliasMap,
    resolved: &ResolvedTables,
) -> StatementResult<SelectStatement> {
    let projection = project(selection, aliases, resolved)?;

    let targets: HashSet<&str> = joins.iter().map(|j| j.target.as_str()).collect();
    let Some(root_name) = selection
        .keys()
        .find(|t| !targets.contains(t.as_str()))
        .or_else(|| selection.keys().next())
    else {
        return Err(ConfigError::EmptyProjection.into());
    };
    let mut root = table_handle(resolved, root_name, aliases, Location::Selection)?.table_ref();

    let mut in_scope: HashSet<&str> = HashSet::from([root_name.as_str()]);
    for (index, join) in joins.iter().enumerate() {
        if join.target == *root_name {
            return Err(ResolutionError::SelfJoin {
                table: join.target.clone(),
                index,
            }
            .into());
        }
        in_scope.insert(join.target.as_str());

        let target_location = Location::join(index, Endpoint::Target);
        let target = table_handle(resolved, &join.target, aliases, target_location)?;

        let left_location = Location::join(index, Endpoint::Left);
        let left = resolve_endpoint(resolved, aliases, &in_scope, &join.left, left_location)?;
        let right_location = Location::join(index, Endpoint::Right);
        let right = resolve_endpoint(resolved, aliases, &in_scope, &join.right, right_location)?;

        debug!(index, target = %join.target, join_type = join.join_type.name(), "Applying join");
        root = root.with_join(Join::new(
            join.join_type,
            target.table_ref(),
            Expr::eq(left, right),
        ));
    }

    let mut statement = SelectStatement::new(projection).with_from(root);
    for table in selection.keys() {
        if table != root_name && !targets.contains(table.as_str()) {
            let extra = table_handle(resolved, table, aliases, Location::Selection)?;
            statement = statement.with_from(extra.table_ref());
        }
    }

    Ok(statement)
}
