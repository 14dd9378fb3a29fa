// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for Catalog operations
//!
//! This module defines the error types used throughout the catalog layer.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur during Catalog operations
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum CatalogError {
    /// Failed to connect to the database
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Reflection query failed in the driver
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Requested table was not found
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// A schema definition names a column type that cannot be created
    #[error("Unsupported type '{type_name}' for column '{column}' of table '{table}'")]
    UnsupportedType {
        table: String,
        column: String,
        type_name: String,
    },

    /// Failed to read or deserialize a schema definition
    #[error("Failed to read schema definition: {0}")]
    SerializationError(String),

    /// A schema definition names the same table or column twice
    #[error("Duplicate key '{key}' in {scope}")]
    DuplicateKey { key: String, scope: String },

    /// Invalid catalog configuration
    #[error("Invalid catalog configuration: {0}")]
    ConfigurationError(String),
}

impl CatalogError {
    /// True when the schema source itself could not be reached or queried,
    /// as opposed to the schema lacking something that was asked for.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            CatalogError::ConnectionFailed(_) | CatalogError::QueryFailed(_)
        )
    }
}
