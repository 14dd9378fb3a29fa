// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for cygnet processes

use thiserror::Error;

pub type StepResult<T> = Result<T, StepError>;

pub type ProcessResult<T> = Result<T, ProcessError>;

/// Why a step could not produce its output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// A data issue the step anticipated, e.g. a malformed input file
    #[error("Known issue with '{input}': {message}")]
    Known { input: String, message: String },

    /// Anything else
    #[error("{0}")]
    Failed(String),
}

impl StepError {
    pub fn known(input: impl Into<String>, message: impl Into<String>) -> Self {
        StepError::Known {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        StepError::Failed(message.into())
    }

    pub fn is_known(&self) -> bool {
        matches!(self, StepError::Known { .. })
    }
}

/// Why a process stopped early
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("Process '{process}' stopped: step '{step}' cannot handle its input")]
    Rejected { process: String, step: String },

    #[error("Process '{process}' stopped: step '{step}' failed: {source}")]
    StepFailed {
        process: String,
        step: String,
        source: StepError,
    },
}

impl ProcessError {
    /// Name of the step the process stopped at
    pub fn step(&self) -> &str {
        match self {
            ProcessError::Rejected { step, .. } | ProcessError::StepFailed { step, .. } => step,
        }
    }
}
