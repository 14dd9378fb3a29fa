// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # gdt command line
//!
//! ```text
//! gdt <config> [--db-config PATH] [--local-db PATH] [--run] [--log-dir DIR]
//! gdt <config> --schema SCHEMA
//! ```
//!
//! Prints the SQL built from the statement config. With `--run` the statement
//! is executed and its result follows as a JSON object holding `columns` and
//! positional `rows`, so repeated column names keep every value. With `--schema` the
//! statement is built against a schema definition file and no database is
//! opened.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gdt_catalog::StaticCatalog;
use gdt_logging::{LoggingOptions, use_gdt_logging};
use gdt_statement::StatementConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "gdt", author, version, about, long_about = None)]
pub struct Cli {
    /// Statement config (JSON, or YAML for .yaml/.yml)
    pub config: PathBuf,

    /// Connection config; defaults to the statement config file
    #[arg(long, value_name = "PATH")]
    pub db_config: Option<PathBuf>,

    /// Keep data in this SQLite file instead of the configured URL
    #[arg(long, value_name = "PATH")]
    pub local_db: Option<PathBuf>,

    /// Build against a schema definition file instead of a live database
    #[arg(long, value_name = "PATH", conflicts_with_all = ["db_config", "local_db", "run"])]
    pub schema: Option<PathBuf>,

    /// Execute the statement and print its rows as JSON
    #[arg(long)]
    pub run: bool,

    /// Write gdt.log and KnownExceptions.log into this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Install a subscriber: the gdt file layout with `--log-dir`, otherwise
/// `RUST_LOG`-filtered output on stderr
pub fn init_logging(cli: &Cli) -> Result<()> {
    if let Some(dir) = &cli.log_dir {
        use_gdt_logging(LoggingOptions::new(dir).with_panic_hook())?;
        return Ok(());
    }

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

/// Build the statement and write the output to `out`
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = StatementConfig::from_path(&cli.config)
        .with_context(|| format!("Cannot load statement config {}", cli.config.display()))?;

    if let Some(schema) = &cli.schema {
        let catalog = StaticCatalog::from_path(schema)
            .with_context(|| format!("Cannot load schema {}", schema.display()))?;
        let statement = config.build(&catalog)?;
        writeln!(out, "{statement}")?;
        return Ok(());
    }

    let db_config = cli.db_config.as_ref().unwrap_or(&cli.config);
    let engine = gdt_database::connect(db_config, cli.local_db.as_deref())?;
    let statement = config.build(&engine)?;
    writeln!(out, "{statement}")?;

    if cli.run {
        let frame = gdt_database::select(&engine, &statement)?;
        info!(rows = frame.len(), "Statement executed");
        serde_json::to_writer_pretty(&mut *out, &frame)?;
        writeln!(out)?;
    }
    Ok(())
}
