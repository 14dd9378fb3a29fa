// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQLite engine
//!
//! [`Engine`] owns a sqlx pool and a single-threaded tokio runtime and exposes
//! a blocking API over both. It must not be driven from inside another tokio
//! runtime.
//!
//! The engine is also a [`SchemaSource`]: every lookup reflects the live
//! catalog, so tables created after connecting are visible immediately.

use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use gdt_catalog::{CatalogError, CatalogResult, SchemaSource, TableHandle};
use gdt_ir::{ColumnMetadata, DataType, TableMetadata};
use serde_json::Value;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, instrument};

use crate::config::{DatabaseConfig, DatabaseTarget};
use crate::error::{DatabaseError, DatabaseResult};
use crate::frame::Frame;

pub(crate) type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Blocking handle on a SQLite database
#[derive(Debug)]
pub struct Engine {
    pool: SqlitePool,
    runtime: Runtime,
    target: DatabaseTarget,
}

impl Engine {
    /// Open the database a config points at
    #[instrument(skip_all, fields(url = %config.url))]
    pub fn connect(config: &DatabaseConfig) -> DatabaseResult<Self> {
        let target = config.target()?;
        Self::open(target, config)
    }

    /// Open `config` but store data in `path` regardless of its URL
    pub fn connect_file(config: &DatabaseConfig, path: &Path) -> DatabaseResult<Self> {
        Self::open(DatabaseTarget::File(path.to_path_buf()), config)
    }

    /// Private in-memory database
    pub fn in_memory() -> DatabaseResult<Self> {
        Self::open(DatabaseTarget::Memory, &DatabaseConfig::new("sqlite://"))
    }

    fn open(target: DatabaseTarget, config: &DatabaseConfig) -> DatabaseResult<Self> {
        let failed = |message: String| DatabaseError::ConnectionFailed {
            url: config.url.clone(),
            message,
        };

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| failed(e.to_string()))?;

        let acquire_timeout = Duration::from_secs(config.timeout_secs);
        let pool = match &target {
            // every connection to :memory: is its own database, so pin one
            DatabaseTarget::Memory => {
                let options =
                    SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| failed(e.to_string()))?;
                runtime.block_on(
                    SqlitePoolOptions::new()
                        .max_connections(1)
                        .min_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None)
                        .acquire_timeout(acquire_timeout)
                        .connect_with(options),
                )
            }
            DatabaseTarget::File(path) => {
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                runtime.block_on(
                    SqlitePoolOptions::new()
                        .max_connections(config.max_connections.max(1))
                        .acquire_timeout(acquire_timeout)
                        .connect_with(options),
                )
            }
        }
        .map_err(|e| failed(e.to_string()))?;

        info!(database = ?target, "Connected to database");
        Ok(Self {
            pool,
            runtime,
            target,
        })
    }

    pub fn target(&self) -> &DatabaseTarget {
        &self.target
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Run a statement that returns no rows
    pub fn execute(&self, sql: &str) -> DatabaseResult<u64> {
        debug!(sql, "Executing");
        let result = self
            .block_on(sqlx::query(sql).execute(&self.pool))
            .map_err(|e| DatabaseError::query(sql, e))?;
        Ok(result.rows_affected())
    }

    /// Run a query and collect its result set
    pub fn fetch(&self, sql: &str) -> DatabaseResult<Frame> {
        debug!(sql, "Fetching");
        let (columns, rows) = self
            .block_on(async {
                let prepared = Executor::prepare(&self.pool, sql).await?;
                let columns: Vec<String> = prepared
                    .columns()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect();
                let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
                Ok::<_, sqlx::Error>((columns, rows))
            })
            .map_err(|e| DatabaseError::query(sql, e))?;

        let mut frame = Frame::new(columns);
        for row in &rows {
            let values = decode_row(row).map_err(|e| DatabaseError::query(sql, e))?;
            frame.push_row(values)?;
        }
        Ok(frame)
    }

    pub fn table_exists(&self, name: &str) -> DatabaseResult<bool> {
        self.find_table(name)
            .map(|found| found.is_some())
            .map_err(DatabaseError::from)
    }

    fn find_table(&self, name: &str) -> CatalogResult<Option<String>> {
        self.block_on(
            sqlx::query_scalar::<_, String>(
                "SELECT name FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
            )
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .map_err(catalog_error)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

impl SchemaSource for Engine {
    #[instrument(skip(self))]
    fn get_table(&self, name: &str) -> CatalogResult<TableHandle> {
        if self.find_table(name)?.is_none() {
            return Err(CatalogError::TableNotFound(name.to_string()));
        }

        let columns = self
            .block_on(
                sqlx::query_as::<_, (String, String, i64, i64)>(
                    "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
                )
                .bind(name)
                .fetch_all(&self.pool),
            )
            .map_err(catalog_error)?;

        let columns = columns
            .into_iter()
            .map(|(column, declared, not_null, pk)| {
                let metadata = ColumnMetadata::new(column, DataType::from_declared(&declared))
                    .with_nullable(not_null == 0);
                if pk > 0 { metadata.with_primary_key() } else { metadata }
            })
            .collect();

        debug!(table = name, "Reflected table");
        Ok(TableHandle::new(TableMetadata::new(name).with_columns(columns)))
    }

    fn list_tables(&self) -> CatalogResult<Vec<String>> {
        self.block_on(
            sqlx::query_scalar::<_, String>(
                "SELECT name FROM sqlite_master WHERE type IN ('table', 'view') \
                 AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .fetch_all(&self.pool),
        )
        .map_err(catalog_error)
    }
}

fn catalog_error(err: sqlx::Error) -> CatalogError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => CatalogError::ConnectionFailed(err.to_string()),
        _ => CatalogError::QueryFailed(err.to_string()),
    }
}

/// Bind a JSON value as a statement parameter
pub(crate) fn bind_value<'q>(query: SqliteQuery<'q>, value: &Value) -> SqliteQuery<'q> {
    match value {
        Value::Null => query.bind(None::<i64>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.to_string()),
    }
}

fn decode_row(row: &SqliteRow) -> Result<Vec<Value>, sqlx::Error> {
    (0..row.len()).map(|i| decode_value(row, i)).collect()
}

fn decode_value(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();
    let declared = row.column(index).type_info().name().to_string();

    let value = match storage.as_str() {
        "INTEGER" if declared == "BOOLEAN" => Value::Bool(row.try_get_unchecked::<i64, _>(index)? != 0),
        "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" => serde_json::Number::from_f64(row.try_get_unchecked::<f64, _>(index)?)
            .map_or(Value::Null, Value::Number),
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::String(bytes.iter().map(|b| format!("{b:02x}")).collect())
        }
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}
