// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Writing tables
//!
//! Frames are written inside one transaction: either every row lands or the
//! table is left as it was.

use gdt_ir::{DataType, TableMetadata, quote_ident};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::engine::{Engine, bind_value};
use crate::error::{DatabaseError, DatabaseResult};
use crate::frame::Frame;

/// Name used by [`create_from_frame`] when none is given
pub const DEFAULT_TABLE_NAME: &str = "unnamed_table";

/// What to do when the target table already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    /// Return [`DatabaseError::TableExists`]
    Fail,
    /// Drop the table and recreate it from the frame
    #[default]
    Replace,
    /// Insert into the existing table
    Append,
}

fn column_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(c).into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

fn create_sql(table: &str, columns: &[String], types: &[DataType]) -> String {
    let definitions = columns
        .iter()
        .zip(types)
        .map(|(c, t)| format!("{} {}", quote_ident(c), t.sql_name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({definitions})", quote_ident(table))
}

/// Write `frame` into `table`, returning the number of rows inserted
#[instrument(skip(engine, frame), fields(rows = frame.len()))]
pub fn insert(
    engine: &Engine,
    table: &str,
    frame: &Frame,
    if_exists: IfExists,
) -> DatabaseResult<u64> {
    if frame.columns().is_empty() {
        return Err(DatabaseError::InvalidFrame("frame has no columns".to_string()));
    }

    let exists = engine.table_exists(table)?;
    if exists && if_exists == IfExists::Fail {
        return Err(DatabaseError::TableExists(table.to_string()));
    }

    let drop = (exists && if_exists == IfExists::Replace)
        .then(|| format!("DROP TABLE {}", quote_ident(table)));
    let create = (!exists || if_exists == IfExists::Replace)
        .then(|| create_sql(table, frame.columns(), &frame.infer_types()));
    let placeholders = vec!["?"; frame.columns().len()].join(", ");
    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quote_ident(table),
        column_list(frame.columns())
    );

    let inserted = engine
        .block_on(async {
            let mut tx = engine.pool().begin().await?;
            for ddl in drop.iter().chain(create.iter()) {
                sqlx::query(ddl).execute(&mut *tx).await?;
            }
            let mut inserted = 0;
            for row in frame.rows() {
                let query = row
                    .iter()
                    .fold(sqlx::query(&insert_sql), |query, value| bind_value(query, value));
                inserted += query.execute(&mut *tx).await?.rows_affected();
            }
            tx.commit().await?;
            Ok::<_, sqlx::Error>(inserted)
        })
        .map_err(|e| DatabaseError::query(&insert_sql, e))?;

    info!(table, inserted, "Wrote frame");
    Ok(inserted)
}

/// Create a table shaped like `frame` and load it
///
/// The table is named [`DEFAULT_TABLE_NAME`] unless `table` is given. Fails if
/// it already exists.
pub fn create_from_frame(
    engine: &Engine,
    frame: &Frame,
    table: Option<&str>,
) -> DatabaseResult<String> {
    let table = table.unwrap_or(DEFAULT_TABLE_NAME);
    insert(engine, table, frame, IfExists::Fail)?;
    Ok(table.to_string())
}

/// Create empty tables from schema metadata
pub fn create_tables<'a>(
    engine: &Engine,
    tables: impl IntoIterator<Item = &'a TableMetadata>,
) -> DatabaseResult<usize> {
    let mut created = 0;
    for table in tables {
        let definitions = table
            .columns
            .iter()
            .map(|c| {
                let mut definition = format!("{} {}", quote_ident(&c.name), c.data_type.sql_name());
                if c.is_primary_key {
                    definition.push_str(" PRIMARY KEY");
                } else if !c.nullable {
                    definition.push_str(" NOT NULL");
                }
                definition
            })
            .collect::<Vec<_>>()
            .join(", ");
        engine.execute(&format!(
            "CREATE TABLE {} ({definitions})",
            quote_ident(&table.name)
        ))?;
        created += 1;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sql_quotes_identifiers() {
        let sql = create_sql(
            "Assays",
            &["from".to_string(), "au_ppm".to_string()],
            &[DataType::Double, DataType::Double],
        );
        assert_eq!(sql, "CREATE TABLE \"Assays\" (\"from\" DOUBLE, au_ppm DOUBLE)");
    }

    #[test]
    fn test_if_exists_parses_lowercase() {
        let value: IfExists = serde_json::from_str("\"append\"").unwrap();
        assert_eq!(value, IfExists::Append);
        assert_eq!(IfExists::default(), IfExists::Replace);
    }
}
