// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Reading statements back out of an engine.

use gdt_ir::SelectStatement;
use tracing::{debug, instrument};

use crate::engine::Engine;
use crate::error::DatabaseResult;
use crate::frame::Frame;

/// Run a built statement; columns are labelled in projection order
#[instrument(skip_all, fields(sql = %statement))]
pub fn select(engine: &Engine, statement: &SelectStatement) -> DatabaseResult<Frame> {
    let frame = engine.fetch(&statement.to_string())?;
    debug!(rows = frame.len(), "Selected");
    Ok(frame)
}

/// Run raw SQL
pub fn select_sql(engine: &Engine, sql: &str) -> DatabaseResult<Frame> {
    engine.fetch(sql)
}

/// Run `statement` limited to one row to prove the engine accepts it
pub fn validate_statement(engine: &Engine, statement: &SelectStatement) -> DatabaseResult<()> {
    let probe = statement.clone().with_limit(1);
    engine.fetch(&probe.to_string()).map(|_| ())
}
