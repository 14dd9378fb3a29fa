// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Statement-specific test helpers and custom assertions

use gdt_ir::{JoinType, SelectStatement};

/// Custom assertion helpers for built statements
pub struct StatementAssertions;

impl StatementAssertions {
    /// Assert the projection as unquoted `table.column` strings, in order
    pub fn assert_projection(statement: &SelectStatement, expected: &[&str]) {
        let actual: Vec<String> = statement.projection.iter().map(|c| c.qualified()).collect();
        assert_eq!(actual, expected, "Projection mismatch in {statement}");
    }

    /// Assert the joined tables, by the name the statement uses for them, in order
    pub fn assert_join_chain(statement: &SelectStatement, expected: &[&str]) {
        let actual: Vec<&str> = statement
            .joins()
            .map(|j| j.table.reference_name())
            .collect();
        assert_eq!(actual, expected, "Join chain mismatch in {statement}");
    }

    /// Assert the type of every join, in order
    pub fn assert_join_types(statement: &SelectStatement, expected: &[JoinType]) {
        let actual: Vec<JoinType> = statement.joins().map(|j| j.join_type).collect();
        assert_eq!(actual, expected, "Join type mismatch in {statement}");
    }

    /// Assert that no table is referenced by its canonical name
    pub fn assert_never_references(statement: &SelectStatement, table: &str) {
        for column in &statement.projection {
            assert_ne!(
                column.table.as_deref(),
                Some(table),
                "Column {} is read through '{table}'",
                column.qualified()
            );
        }
        for join in statement.joins() {
            assert_ne!(
                join.table.reference_name(),
                table,
                "Join target is referenced as '{table}'"
            );
        }
        let root = statement.from.first().map(|t| t.reference_name());
        assert_ne!(root, Some(table), "FROM root is referenced as '{table}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdt_ir::{ColumnRef, Expr, Join, TableRef};

    fn statement() -> SelectStatement {
        let join = Join::new(
            JoinType::Left,
            TableRef::new("t2").with_alias("b"),
            Expr::eq(
                ColumnRef::new("y").with_table("b"),
                ColumnRef::new("x").with_table("a"),
            ),
        );
        SelectStatement::new(vec![
            ColumnRef::new("x").with_table("a"),
            ColumnRef::new("y").with_table("b"),
        ])
        .with_from(TableRef::new("t1").with_alias("a").with_join(join))
    }

    #[test]
    fn test_assertions_pass_on_matching_statement() {
        let stmt = statement();
        StatementAssertions::assert_projection(&stmt, &["a.x", "b.y"]);
        StatementAssertions::assert_join_chain(&stmt, &["b"]);
        StatementAssertions::assert_join_types(&stmt, &[JoinType::Left]);
        StatementAssertions::assert_never_references(&stmt, "t1");
        StatementAssertions::assert_never_references(&stmt, "t2");
    }

    #[test]
    #[should_panic(expected = "Projection mismatch")]
    fn test_projection_mismatch_panics() {
        StatementAssertions::assert_projection(&statement(), &["b.y", "a.x"]);
    }
}
