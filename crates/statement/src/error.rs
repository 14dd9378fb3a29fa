// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Error types for statement building
//!
//! Three families of failure, matching what an operator has to fix:
//!
//! - [`ConfigError`]: the config document is unreadable or has the wrong shape
//! - [`ResolutionError`]: the config names a table or column the schema lacks
//! - [`StatementError::Connectivity`]: the schema source itself failed
//! - [`StatementError::Schema`]: the source was reached but cannot describe
//!   the table, e.g. an unsupported column type

use std::fmt;

use gdt_catalog::CatalogError;
use thiserror::Error;

/// Result type alias for config parsing
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for statement building
pub type StatementResult<T> = Result<T, StatementError>;

/// Errors raised while reading or validating a statement config
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config file {path} is malformed or missing : Should be a readable file ({message})")]
    Unreadable { path: String, message: String },

    #[error("Config file {path} is malformed or missing : Should be valid {format} ({message})")]
    Syntax {
        path: String,
        format: &'static str,
        message: String,
    },

    #[error("Config file {path} has an unsupported extension : Should end in .json, .yaml or .yml")]
    UnsupportedFormat { path: String },

    /// A key is absent or holds the wrong shape
    #[error("Config is malformed or missing : Should contain {expected} at '{path}'")]
    Malformed { path: String, expected: String },

    #[error(
        "Config is malformed or missing : Should select at least one column under 'statement_configs.selection'"
    )]
    EmptyProjection,

    #[error("Alias '{alias}' is given to both [{first}] and [{second}]")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("Alias '{alias}' for [{table}] has the same name as another table in the config")]
    AliasConflict { alias: String, table: String },
}

/// Which part of a join entry a reference came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Target,
    Left,
    Right,
}

/// Where in the config a table or column reference came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Selection,
    Aliases,
    Join { index: usize, endpoint: Endpoint },
}

impl Location {
    pub fn join(index: usize, endpoint: Endpoint) -> Self {
        Location::Join { index, endpoint }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Selection => f.write_str("selection"),
            Location::Aliases => f.write_str("aliases"),
            Location::Join { index, endpoint } => {
                let part = match endpoint {
                    Endpoint::Target => "target",
                    Endpoint::Left => "left",
                    Endpoint::Right => "right",
                };
                write!(f, "joins[{index}] {part}")
            }
        }
    }
}

/// A config reference that does not match the schema
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Table [{table}] specified in config ({location}), does not exist in engine.")]
    MissingTable { table: String, location: Location },

    #[error(
        "Column [{column}] specified in config ({location}), does not exist in table. [{table}] contains columns [{columns}].",
        columns = .available.join(", ")
    )]
    MissingColumn {
        column: String,
        table: String,
        available: Vec<String>,
        location: Location,
    },

    #[error("Join {index} attaches [{table}] onto itself, but it is already the first table of the statement.")]
    SelfJoin { table: String, index: usize },

    #[error("Table [{table}] referenced at {location} is not part of the statement at that point.")]
    NotInStatement { table: String, location: Location },
}

impl ResolutionError {
    /// Table the error is about
    pub fn table(&self) -> &str {
        match self {
            ResolutionError::MissingTable { table, .. }
            | ResolutionError::MissingColumn { table, .. }
            | ResolutionError::SelfJoin { table, .. }
            | ResolutionError::NotInStatement { table, .. } => table,
        }
    }
}

/// Errors that abort a statement build
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatementError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(
        "Schema source unavailable while resolving table [{table}]: {source}. Check network status, VPN, or that the configured driver is installed."
    )]
    Connectivity { table: String, source: CatalogError },

    #[error("Schema source cannot describe table [{table}]: {source}")]
    Schema { table: String, source: CatalogError },
}

impl StatementError {
    /// True for environment failures, false for config mistakes
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StatementError::Connectivity { .. })
    }
}
