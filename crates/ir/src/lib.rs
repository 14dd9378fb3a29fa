// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Geo Digital Tools - Statement Representation
//!
//! This crate provides the in-memory representation of the SELECT statements
//! that the statement builder produces, and the schema metadata that schema
//! sources hand out.
//!
//! The representation is designed to:
//! - Preserve projection order and join order exactly as configured
//! - Render deterministically to SQL text (same input, same string)
//! - Stay engine-agnostic: executing a statement is somebody else's job

pub mod expr;
pub mod metadata;
pub mod query;
pub mod render;

// Re-export commonly used types
pub use expr::{BinaryOp, ColumnRef, Expr};
pub use metadata::{ColumnMetadata, DataType, TableMetadata, UnsupportedTypeError};
pub use query::{Join, JoinType, SelectStatement, TableRef, UnknownJoinTypeError};
pub use render::quote_ident;
