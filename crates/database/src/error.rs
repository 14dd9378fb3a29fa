// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for database operations

use gdt_catalog::CatalogError;
use thiserror::Error;

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors that can occur while connecting to or using an engine
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The connection config file does not exist
    #[error("{0} not found.")]
    ConfigNotFound(String),

    /// The connection config could not be read or has the wrong shape
    #[error("Malformed config file: While parsing {path}: {message}")]
    MalformedConfig { path: String, message: String },

    /// The URL names a backend this crate cannot drive
    #[error("Unsupported database URL '{0}': only SQLite engines are supported")]
    UnsupportedBackend(String),

    #[error(
        "Network connection to configured URL [{url}] is not available. Check network status or VPN. ({message})"
    )]
    ConnectionFailed { url: String, message: String },

    /// A statement failed to execute
    #[error("Query failed: {message}\n  SQL: {sql}")]
    QueryFailed { sql: String, message: String },

    /// `IfExists::Fail` and the table is already there
    #[error("Table '{0}' already exists")]
    TableExists(String),

    /// Frame columns and rows disagree
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl DatabaseError {
    pub(crate) fn query(sql: &str, err: sqlx::Error) -> Self {
        DatabaseError::QueryFailed {
            sql: sql.to_string(),
            message: err.to_string(),
        }
    }
}
