// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Tabular data
//!
//! [`Frame`] is the row-major table that moves in and out of an engine:
//! named columns and rows of JSON values.

use gdt_ir::DataType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DatabaseError, DatabaseResult};

/// Named columns with rows of JSON values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Empty frame with the given column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a frame from column vectors of equal length
    pub fn from_columns(columns: IndexMap<String, Vec<Value>>) -> DatabaseResult<Self> {
        let height = columns.values().next().map_or(0, Vec::len);
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != height) {
            return Err(DatabaseError::InvalidFrame(format!(
                "column '{name}' has {} values, expected {height}",
                values.len()
            )));
        }

        let names: Vec<String> = columns.keys().cloned().collect();
        let mut cells: Vec<_> = columns.into_values().map(Vec::into_iter).collect();
        let rows = (0..height)
            .map(|_| cells.iter_mut().filter_map(Iterator::next).collect())
            .collect();
        Ok(Self {
            columns: names,
            rows,
        })
    }

    /// Build a frame from JSON objects; columns follow first-seen key order
    /// and absent keys become null
    pub fn from_records(records: &[Map<String, Value>]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| r.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> DatabaseResult<()> {
        if row.len() != self.columns.len() {
            return Err(DatabaseError::InvalidFrame(format!(
                "row has {} values, expected {}",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn with_row(mut self, row: Vec<Value>) -> DatabaseResult<Self> {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| &r[index]).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as JSON objects keyed by column name
    ///
    /// Repeated column names collapse to the last value in the row.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }

    /// Storage type for each column, inferred from its non-null values
    pub fn infer_types(&self) -> Vec<DataType> {
        (0..self.columns.len())
            .map(|i| infer_column(self.rows.iter().map(|r| &r[i])))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Boolean,
    Integer,
    Real,
    Text,
}

impl Kind {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Kind::Boolean),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Kind::Integer),
            Value::Number(_) => Some(Kind::Real),
            _ => Some(Kind::Text),
        }
    }

    fn promote(self, other: Kind) -> Kind {
        match (self, other) {
            (a, b) if a == b => a,
            (Kind::Integer, Kind::Real) | (Kind::Real, Kind::Integer) => Kind::Real,
            _ => Kind::Text,
        }
    }
}

fn infer_column<'a>(values: impl Iterator<Item = &'a Value>) -> DataType {
    let kind = values
        .filter_map(Kind::of)
        .reduce(Kind::promote)
        .unwrap_or(Kind::Text);
    match kind {
        Kind::Boolean => DataType::Boolean,
        Kind::Integer => DataType::BigInt,
        Kind::Real => DataType::Double,
        Kind::Text => DataType::Text,
    }
}
