// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for geo digital tools
//!
//! This crate provides common testing components including:
//! - A mock schema source that records lookups and can simulate outages
//! - Statement-specific assertions
//! - Config and schema fixtures

pub mod assertions;
pub mod fixtures;
pub mod mock_catalog;

// Re-exports for convenience
pub use assertions::StatementAssertions;
pub use fixtures::ConfigFixtures;
pub use mock_catalog::{MockCatalog, MockCatalogBuilder};
