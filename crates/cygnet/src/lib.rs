// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Geo Digital Tools - Cygnet Scaffolding
//!
//! A cygnet harmonises one kind of source data. It is written as a
//! [`Process`] of [`Step`]s, each checking its input before transforming it.
//!
//! ```rust
//! use gdt_cygnet::{FnStep, Process, StepError};
//!
//! let process = Process::new("depths")
//!     .with_step(FnStep::new("parse", |s: String| {
//!         s.trim().parse::<f64>().map(|d| d.to_string()).map_err(|e| StepError::known(s, e.to_string()))
//!     }))
//!     .with_step(FnStep::new("suffix", |s: String| Ok(format!("{s} m"))));
//!
//! assert_eq!(process.run(" 12.5 ".to_string()).unwrap(), "12.5 m");
//! assert!(process.run("deep".to_string()).is_err());
//! ```

pub mod error;
pub mod process;
pub mod step;

pub use error::{ProcessError, ProcessResult, StepError, StepResult};
pub use process::Process;
pub use step::{FnStep, Step};
