// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Geo Digital Tools - Logging
//!
//! Libraries in this workspace only emit `tracing` events. Binaries and
//! cygnet scripts opt in to the recommended subscriber with
//! [`use_gdt_logging`]:
//!
//! | Sink | Level | Content |
//! |------|-------|---------|
//! | stdout | WARN+ (or `RUST_LOG`) | everything but known exceptions |
//! | `<log_dir>/gdt.log` | INFO+ | everything but known exceptions |
//! | `<log_dir>/KnownExceptions.log` | INFO+ | known exceptions only |
//!
//! Known exceptions are data issues a cygnet step expected and handled, such
//! as a CSV with an unusual delimiter. Collecting them in one file shows where
//! most inputs fail. Emit them with [`known_exception`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{Level, Metadata, error, info, warn};
use tracing_subscriber::filter::{EnvFilter, filter_fn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

pub mod rotating;

pub use rotating::{RotatingFile, SharedFile};

/// Target carried by every known-exception event
pub const KNOWN_EXCEPTIONS_TARGET: &str = "known_exceptions";

pub const GENERAL_LOG: &str = "gdt.log";
pub const KNOWN_EXCEPTIONS_LOG: &str = "KnownExceptions.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Cannot create log directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Cannot open log file {path}: {source}")]
    OpenFile { path: PathBuf, source: io::Error },

    #[error("A global tracing subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

pub type LoggingResult<T> = Result<T, LoggingError>;

/// Settings for [`use_gdt_logging`]
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    pub log_dir: PathBuf,
    /// Log panics at ERROR before running the previous panic hook
    pub panic_hook: bool,
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            panic_hook: false,
            max_bytes: 1_048_576,
            backups: 2,
        }
    }
}

impl LoggingOptions {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_panic_hook(mut self) -> Self {
        self.panic_hook = true;
        self
    }
}

/// Paths of the files the subscriber writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFiles {
    pub general: PathBuf,
    pub known_exceptions: PathBuf,
}

fn is_known_exception(metadata: &Metadata<'_>) -> bool {
    metadata.target() == KNOWN_EXCEPTIONS_TARGET
}

fn open(dir: &Path, name: &str, options: &LoggingOptions) -> LoggingResult<SharedFile> {
    let path = dir.join(name);
    RotatingFile::create(&path, options.max_bytes, options.backups)
        .map(SharedFile::new)
        .map_err(|source| LoggingError::OpenFile { path, source })
}

/// Install the recommended global subscriber
///
/// Both log files are truncated. Fails if a global subscriber already exists.
pub fn use_gdt_logging(options: LoggingOptions) -> LoggingResult<LogFiles> {
    let dir = options.log_dir.as_path();
    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let general = open(dir, GENERAL_LOG, &options)?;
    let known = open(dir, KNOWN_EXCEPTIONS_LOG, &options)?;

    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stdout_layer = fmt::layer()
        .with_writer(io::stdout)
        .with_filter(stdout_filter)
        .with_filter(filter_fn(|m| !is_known_exception(m)));

    let general_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(general)
        .with_filter(filter_fn(|m| !is_known_exception(m) && *m.level() <= Level::INFO));

    let known_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(known)
        .with_filter(filter_fn(|m| is_known_exception(m) && *m.level() <= Level::INFO));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(general_layer)
        .with(known_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    let files = LogFiles {
        general: dir.join(GENERAL_LOG),
        known_exceptions: dir.join(KNOWN_EXCEPTIONS_LOG),
    };
    warn!(log_dir = %dir.display(), "Initialised logging with gdt configuration");

    if options.panic_hook {
        install_panic_hook();
        warn!("Panic hook installed: panics are logged before unwinding");
    }

    Ok(files)
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!(panic = %info, "Quit due to uncaught panic");
        previous(info);
    }));
}

/// Record a data issue a step expected and handled
///
/// `process` and `step` identify where it happened and `input` what was
/// being processed, e.g. a file name.
pub fn known_exception(process: &str, step: &str, input: &str, message: &str) {
    info!(target: KNOWN_EXCEPTIONS_TARGET, process, step, input, "KnownException: {message}");
}
