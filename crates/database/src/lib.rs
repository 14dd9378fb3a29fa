// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Geo Digital Tools - Database Glue
//!
//! Config-driven helpers around a SQLite [`Engine`]:
//!
//! - [`connect`]: open the engine a connection config points at
//! - [`insert`] / [`create_from_frame`] / [`create_tables`]: write data
//! - [`select`] / [`validate_statement`]: run statements built by `gdt-statement`
//! - [`write_runtime_metadata`]: record run provenance
//!
//! [`Engine`] implements `SchemaSource`, so it can be handed straight to the
//! statement builder.
//!
//! ## Usage
//!
//! ```rust
//! use gdt_database::{Engine, Frame, IfExists, insert, select_sql};
//! use serde_json::json;
//!
//! let engine = Engine::in_memory().unwrap();
//! let frame = Frame::new(["hole_id", "depth"])
//!     .with_row(vec![json!("DH001"), json!(12.5)])
//!     .unwrap();
//! insert(&engine, "surveys", &frame, IfExists::Replace).unwrap();
//!
//! let read = select_sql(&engine, "SELECT hole_id, depth FROM surveys").unwrap();
//! assert_eq!(read, frame);
//! ```

use std::path::Path;

use tracing::instrument;

pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod read;
pub mod runtime_metadata;
pub mod write;

pub use config::{DatabaseConfig, DatabaseTarget};
pub use engine::Engine;
pub use error::{DatabaseError, DatabaseResult};
pub use frame::Frame;
pub use read::{select, select_sql, validate_statement};
pub use runtime_metadata::{RUNTIME_METADATA_TABLE, RuntimeMetadata, write_runtime_metadata};
pub use write::{DEFAULT_TABLE_NAME, IfExists, create_from_frame, create_tables, insert};

/// Open the engine described by the connection config at `cfg_path`
///
/// With `local_db_path` set, the config's pool settings are kept but data is
/// stored in that SQLite file instead of the configured URL.
#[instrument(skip_all, fields(config = %cfg_path.as_ref().display()))]
pub fn connect(
    cfg_path: impl AsRef<Path>,
    local_db_path: Option<&Path>,
) -> DatabaseResult<Engine> {
    let config = DatabaseConfig::from_path(cfg_path.as_ref())?;
    match local_db_path {
        Some(path) => Engine::connect_file(&config, path),
        None => Engine::connect(&config),
    }
}
