// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement Representation
//!
//! This module represents the SELECT statements produced by the builder.
//!
//! ## SELECT Statement
//!
//! [`SelectStatement`] contains:
//!
//! - **Projection**: qualified columns, in configured order
//! - **FROM**: table sources, the first of which carries the join chain
//! - **LIMIT**: optional row cap, used when probing a statement
//!
//! ## Table References and Joins
//!
//! [`TableRef`] represents a table in the FROM clause with:
//!
//! - **Name**: Table name as the engine knows it
//! - **Alias**: Label the statement refers to the table by
//! - **Joins**: Joined tables, in the order they were added
//!
//! [`Join`] represents a join with its [`JoinType`] (INNER, LEFT OUTER or
//! FULL OUTER) and an `ON` condition.
//!
//! ## Rendering
//!
//! Every type implements `Display`; rendering is single-line and
//! deterministic:
//!
//! ```sql
//! SELECT t1.a, t2.b FROM t1 JOIN t2 ON t2.b = t1.a
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expr::{ColumnRef, Expr};
use crate::render::quote_ident;

/// SELECT statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectStatement {
    /// SELECT columns
    pub projection: Vec<ColumnRef>,

    /// FROM clause
    pub from: Vec<TableRef>,

    /// LIMIT clause
    pub limit: Option<u64>,
}

impl SelectStatement {
    pub fn new(projection: Vec<ColumnRef>) -> Self {
        Self {
            projection,
            from: Vec::new(),
            limit: None,
        }
    }

    pub fn with_from(mut self, table: TableRef) -> Self {
        self.from.push(table);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Names of the result columns, in projection order
    pub fn column_labels(&self) -> Vec<&str> {
        self.projection.iter().map(|c| c.column.as_str()).collect()
    }

    /// All joins, in render order
    pub fn joins(&self) -> impl Iterator<Item = &Join> {
        self.from.iter().flat_map(|t| t.joins.iter())
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        write_list(f, &self.projection)?;
        if !self.from.is_empty() {
            f.write_str(" FROM ")?;
            write_list(f, &self.from)?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        Ok(())
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Table reference in FROM clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
    pub joins: Vec<Join>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            joins: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Name the rest of the statement refers to this table by
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote_ident(&self.name))?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", quote_ident(alias))?;
        }
        for join in &self.joins {
            write!(f, " {join}")?;
        }
        Ok(())
    }
}

/// JOIN clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub condition: Expr,
}

impl Join {
    pub fn new(join_type: JoinType, table: TableRef, condition: Expr) -> Self {
        Self {
            join_type,
            table,
            condition,
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ON {}",
            self.join_type.keyword(),
            self.table,
            self.condition
        )
    }
}

/// JOIN type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    #[serde(alias = "outer")]
    Left,
    Full,
}

impl JoinType {
    /// Config spelling (`inner`, `left`, `full`)
    pub fn name(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Full => "full",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "JOIN",
            JoinType::Left => "LEFT OUTER JOIN",
            JoinType::Full => "FULL OUTER JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown join type '{0}', expected one of inner, left, outer, full")]
pub struct UnknownJoinTypeError(pub String);

impl FromStr for JoinType {
    type Err = UnknownJoinTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" | "outer" => Ok(JoinType::Left),
            "full" => Ok(JoinType::Full),
            _ => Err(UnknownJoinTypeError(s.to_string())),
        }
    }
}
