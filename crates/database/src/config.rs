// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Connection configuration
//!
//! A connection config is a JSON document with either a `database` section:
//!
//! ```json
//! {"database": {"url": "sqlite:///data/geo.db", "max_connections": 4}}
//! ```
//!
//! or the older `sqlalchemy` section holding only the URL:
//!
//! ```json
//! {"sqlalchemy": {"sqlalchemy.url": "sqlite+pysqlite:///:memory:"}}
//! ```
//!
//! YAML files (`.yaml`/`.yml`) use the same layout. Only SQLite URLs are
//! accepted. A driver suffix (`sqlite+pysqlite`) is ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DatabaseError, DatabaseResult};

const DATABASE_KEY: &str = "database";
const LEGACY_KEY: &str = "sqlalchemy";
const LEGACY_URL_KEY: &str = "sqlalchemy.url";

fn default_max_connections() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

/// Connection settings for one engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Read a connection config file
    ///
    /// # Errors
    ///
    /// `ConfigNotFound` when the file is missing, `MalformedConfig` when it is
    /// not JSON (YAML for `.yaml`/`.yml`) or has neither a `database` nor a
    /// `sqlalchemy` section.
    pub fn from_path(path: &Path) -> DatabaseResult<Self> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(DatabaseError::ConfigNotFound(display));
        }

        let malformed = |message: String| DatabaseError::MalformedConfig {
            path: display.clone(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let document: Value = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| malformed(e.to_string()))?
        } else {
            serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?
        };
        Self::from_document(&document).map_err(malformed)
    }

    fn from_document(document: &Value) -> Result<Self, String> {
        if let Some(section) = document.get(DATABASE_KEY) {
            return serde_json::from_value(section.clone()).map_err(|e| e.to_string());
        }

        let url = document
            .get(LEGACY_KEY)
            .and_then(|section| section.get(LEGACY_URL_KEY).or_else(|| section.get("url")))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                format!("expected a '{DATABASE_KEY}' section or '{LEGACY_KEY}.{LEGACY_URL_KEY}'")
            })?;
        Ok(Self::new(url))
    }

    /// Where this config points
    pub fn target(&self) -> DatabaseResult<DatabaseTarget> {
        DatabaseTarget::parse(&self.url)
    }
}

/// A SQLite database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

impl DatabaseTarget {
    /// Parse a SQLite URL
    ///
    /// `sqlite:///rel.db` is relative, `sqlite:////abs.db` is absolute and
    /// `sqlite:///:memory:` (or a bare `sqlite://`) is in memory.
    pub fn parse(url: &str) -> DatabaseResult<Self> {
        let unsupported = || DatabaseError::UnsupportedBackend(url.to_string());
        if url == ":memory:" {
            return Ok(Self::Memory);
        }

        let (scheme, rest) = url.split_once(':').ok_or_else(unsupported)?;
        let backend = scheme.split('+').next().unwrap_or(scheme);
        if backend != "sqlite" {
            return Err(unsupported());
        }

        let path = match rest.strip_prefix("//") {
            Some(after_host) => match after_host.strip_prefix('/') {
                Some(path) => path,
                None if after_host.is_empty() => "",
                None => return Err(unsupported()),
            },
            None => rest,
        };

        match path {
            "" | ":memory:" => Ok(Self::Memory),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}
