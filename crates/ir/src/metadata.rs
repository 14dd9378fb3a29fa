// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for database schema information
//!
//! This module defines the types used to represent the schema of tables a
//! statement can draw from: which columns a table has, in what order, and
//! roughly what kind of values they hold.
//!
//! Two spellings of a column type show up in practice:
//!
//! - **Config names** such as `Integer`, `String` or `DateTime`, used in table
//!   definition documents ([`DataType::from_str`])
//! - **Declared types** reported by the engine's own catalog, such as
//!   `VARCHAR(32)` or `BIGINT` ([`DataType::from_declared`])

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// SQL data types understood by the table definition and reflection layers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataType {
    // Numeric types
    Integer,
    BigInt,
    Decimal,
    Float,
    Double,

    // String types
    Varchar(Option<usize>),
    Text,

    // Binary types
    Blob,

    // Date/Time types
    Date,
    DateTime,
    Timestamp,

    Boolean,
    Json,
    Uuid,

    // Unknown/Other (with original type name)
    Other(String),
}

/// Config type names accepted in table definition documents
pub const SUPPORTED_TYPES: &[&str] = &[
    "BigInteger",
    "Boolean",
    "DateTime",
    "Double",
    "Float",
    "Integer",
    "LargeBinary",
    "Numeric",
    "String",
    "Text",
    "UnicodeText",
    "Uuid",
];

/// A config type name outside [`SUPPORTED_TYPES`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported column type '{0}', expected one of {types:?}", types = SUPPORTED_TYPES)]
pub struct UnsupportedTypeError(pub String);

impl FromStr for DataType {
    type Err = UnsupportedTypeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let data_type = match name {
            "BigInteger" => DataType::BigInt,
            "Boolean" => DataType::Boolean,
            "DateTime" => DataType::DateTime,
            "Double" => DataType::Double,
            "Float" => DataType::Float,
            "Integer" => DataType::Integer,
            "LargeBinary" => DataType::Blob,
            "Numeric" => DataType::Decimal,
            "String" => DataType::Varchar(None),
            "Text" | "UnicodeText" => DataType::Text,
            "Uuid" => DataType::Uuid,
            other => return Err(UnsupportedTypeError(other.to_string())),
        };
        Ok(data_type)
    }
}

impl DataType {
    /// Map a type as declared in the engine catalog onto a [`DataType`].
    ///
    /// Matching is case-insensitive and ignores any length suffix except for
    /// `VARCHAR(n)`, which keeps its length.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.trim().to_uppercase();
        let base = upper.split('(').next().unwrap_or("").trim();

        match base {
            "INT" | "INTEGER" | "SMALLINT" | "TINYINT" | "MEDIUMINT" => DataType::Integer,
            "BIGINT" | "INT8" => DataType::BigInt,
            "DECIMAL" | "NUMERIC" => DataType::Decimal,
            "FLOAT" | "REAL" => DataType::Float,
            "DOUBLE" | "DOUBLE PRECISION" => DataType::Double,
            "VARCHAR" | "CHARACTER VARYING" | "NVARCHAR" => DataType::Varchar(extract_length(&upper)),
            "TEXT" | "CLOB" | "CHAR" | "CHARACTER" => DataType::Text,
            "BLOB" | "BINARY" | "VARBINARY" => DataType::Blob,
            "DATE" => DataType::Date,
            "DATETIME" => DataType::DateTime,
            "TIMESTAMP" => DataType::Timestamp,
            "BOOLEAN" | "BOOL" => DataType::Boolean,
            "JSON" => DataType::Json,
            "UUID" => DataType::Uuid,
            _ => DataType::Other(declared.trim().to_string()),
        }
    }

    /// Type name used when emitting `CREATE TABLE`
    pub fn sql_name(&self) -> String {
        match self {
            DataType::Integer => "INTEGER".to_string(),
            DataType::BigInt => "BIGINT".to_string(),
            DataType::Decimal => "NUMERIC".to_string(),
            DataType::Float => "FLOAT".to_string(),
            DataType::Double => "DOUBLE".to_string(),
            DataType::Varchar(Some(len)) => format!("VARCHAR({len})"),
            DataType::Varchar(None) => "VARCHAR".to_string(),
            DataType::Text => "TEXT".to_string(),
            DataType::Blob => "BLOB".to_string(),
            DataType::Date => "DATE".to_string(),
            DataType::DateTime => "DATETIME".to_string(),
            DataType::Timestamp => "TIMESTAMP".to_string(),
            DataType::Boolean => "BOOLEAN".to_string(),
            DataType::Json => "JSON".to_string(),
            DataType::Uuid => "UUID".to_string(),
            DataType::Other(name) => name.clone(),
        }
    }
}

fn extract_length(declared: &str) -> Option<usize> {
    let start = declared.find('(')?;
    let end = declared[start..].find(')')? + start;
    declared[start + 1..end].trim().parse().ok()
}

/// Metadata for a database column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether the column is nullable
    pub nullable: bool,
    /// Whether this is a primary key
    pub is_primary_key: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            is_primary_key: false,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }
}

/// Metadata for a database table
///
/// Columns are kept in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,
    /// Columns in this table
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_column(mut self, column: ColumnMetadata) -> Self {
        self.columns.push(column);
        self
    }

    /// Get a column by exact name
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_names() {
        assert_eq!("Integer".parse::<DataType>(), Ok(DataType::Integer));
        assert_eq!("String".parse::<DataType>(), Ok(DataType::Varchar(None)));
        assert_eq!("UnicodeText".parse::<DataType>(), Ok(DataType::Text));
        assert_eq!("LargeBinary".parse::<DataType>(), Ok(DataType::Blob));
        for name in SUPPORTED_TYPES {
            assert!(name.parse::<DataType>().is_ok(), "{name} should parse");
        }
    }

    #[test]
    fn test_unsupported_config_name() {
        let err = "UnknownType".parse::<DataType>().unwrap_err();
        assert_eq!(err, UnsupportedTypeError("UnknownType".to_string()));
        assert!(err.to_string().contains("UnknownType"));
    }

    #[test]
    fn test_declared_types() {
        assert_eq!(DataType::from_declared("integer"), DataType::Integer);
        assert_eq!(DataType::from_declared("VARCHAR(32)"), DataType::Varchar(Some(32)));
        assert_eq!(DataType::from_declared("real"), DataType::Float);
        assert_eq!(DataType::from_declared("NUMERIC(10, 2)"), DataType::Decimal);
        assert_eq!(
            DataType::from_declared("GEOMETRY"),
            DataType::Other("GEOMETRY".to_string())
        );
        assert_eq!(DataType::from_declared(""), DataType::Other(String::new()));
    }

    #[test]
    fn test_sql_name() {
        assert_eq!(DataType::Varchar(Some(8)).sql_name(), "VARCHAR(8)");
        assert_eq!(DataType::Decimal.sql_name(), "NUMERIC");
        assert_eq!(DataType::Other("POINT".into()).sql_name(), "POINT");
    }

    #[test]
    fn test_table_metadata() {
        let table = TableMetadata::new("boreholes")
            .with_column(ColumnMetadata::new("hole_id", DataType::Integer).with_primary_key())
            .with_column(ColumnMetadata::new("depth", DataType::Float));

        assert_eq!(table.column_names(), vec!["hole_id", "depth"]);
        assert!(!table.get_column("hole_id").unwrap().nullable);
        assert!(table.get_column("depth").unwrap().nullable);
        assert!(table.get_column("Depth").is_none());
    }
}
