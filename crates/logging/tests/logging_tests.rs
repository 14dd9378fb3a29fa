// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Installs the global subscriber, so everything lives in one test

use std::fs;

use gdt_logging::{LoggingError, LoggingOptions, known_exception, use_gdt_logging};
use tempfile::TempDir;

#[test]
fn test_routes_events_to_their_files() {
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");
    fs::create_dir_all(&log_dir).unwrap();
    fs::write(log_dir.join("gdt.log"), "previous run\n").unwrap();

    let files = use_gdt_logging(LoggingOptions::new(&log_dir)).unwrap();

    tracing::debug!("too chatty for any file");
    tracing::info!(rows = 5, "loaded collars");
    tracing::error!("database unreachable");
    known_exception("drillholes", "read_csv", "holes_2019.csv", "unusual delimiter ';'");

    let general = fs::read_to_string(&files.general).unwrap();
    assert!(!general.contains("previous run"));
    assert!(general.contains("Initialised logging with gdt configuration"));
    assert!(general.contains("loaded collars"));
    assert!(general.contains("database unreachable"));
    assert!(!general.contains("too chatty"));
    assert!(!general.contains("unusual delimiter"));

    let known = fs::read_to_string(&files.known_exceptions).unwrap();
    assert!(known.contains("KnownException: unusual delimiter ';'"));
    assert!(known.contains("process=\"drillholes\""));
    assert!(known.contains("step=\"read_csv\""));
    assert!(known.contains("input=\"holes_2019.csv\""));
    assert!(!known.contains("loaded collars"));

    assert!(matches!(
        use_gdt_logging(LoggingOptions::new(&log_dir)),
        Err(LoggingError::AlreadyInitialized(_))
    ));
}
