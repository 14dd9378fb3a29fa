// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expressions
//!
//! The statement builder only ever needs two kinds of expression:
//!
//! - **Column references**: `table.column`, where `table` is the name the table
//!   is known by inside the statement (its alias when it has one)
//! - **Equality predicates**: `left = right`, used as join conditions
//!
//! ```sql
//! -- Qualified column
//! boreholes.hole_id
//!
//! -- Join predicate
//! samples.hole_id = boreholes.hole_id
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::render::quote_ident;

/// A SQL expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// Column reference (e.g., `table.column`)
    Column(ColumnRef),

    /// Binary operation (e.g., `a.x = b.y`)
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Build the equality predicate `left = right`
    pub fn eq(left: ColumnRef, right: ColumnRef) -> Self {
        Expr::BinaryOp {
            left: Box::new(Expr::Column(left)),
            op: BinaryOp::Eq,
            right: Box::new(Expr::Column(right)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(column) => write!(f, "{column}"),
            Expr::BinaryOp { left, op, right } => write!(f, "{left} {op} {right}"),
        }
    }
}

/// Column reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Table name or alias the column is read through
    pub table: Option<String>,
    /// Column name
    pub column: String,
}

impl ColumnRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Unquoted `table.column` form, handy in diagnostics
    pub fn qualified(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table, self.column),
            None => self.column.clone(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", quote_ident(table), quote_ident(&self.column)),
            None => write!(f, "{}", quote_ident(&self.column)),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Eq,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Eq => f.write_str("="),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_ref() {
        let col = ColumnRef::new("id");
        assert_eq!(col.qualified(), "id");
        assert!(col.table.is_none());

        let qualified = col.with_table("users");
        assert_eq!(qualified.qualified(), "users.id");
        assert_eq!(qualified.table.as_deref(), Some("users"));
    }

    #[test]
    fn test_eq_renders_left_then_right() {
        let expr = Expr::eq(
            ColumnRef::new("b").with_table("t2"),
            ColumnRef::new("a").with_table("t1"),
        );
        assert_eq!(expr.to_string(), "t2.b = t1.a");
    }

    #[test]
    fn test_column_ref_quotes_when_needed() {
        let col = ColumnRef::new("Sample ID").with_table("assays");
        assert_eq!(col.to_string(), "assays.\"Sample ID\"");
        // diagnostics keep the raw spelling
        assert_eq!(col.qualified(), "assays.Sample ID");
    }
}
