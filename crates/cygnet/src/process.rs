// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Processes
//!
//! A [`Process`] runs its steps in insertion order, feeding each step's output
//! to the next. It stops at the first step that rejects its input or fails.
//! Known issues raised by a step go to the known-exceptions log.

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ProcessError, ProcessResult, StepError};
use crate::step::Step;

/// Ordered, named chain of steps
pub struct Process<T> {
    name: String,
    steps: IndexMap<String, Box<dyn Step<T>>>,
}

impl<T> Process<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a step
    ///
    /// A step with the same name is replaced in place and returned.
    pub fn add_step(&mut self, step: impl Step<T> + 'static) -> Option<Box<dyn Step<T>>> {
        self.steps.insert(step.name().to_string(), Box::new(step))
    }

    pub fn with_step(mut self, step: impl Step<T> + 'static) -> Self {
        self.add_step(step);
        self
    }

    /// Remove a step by name, keeping the order of the rest
    pub fn drop_step(&mut self, name: &str) -> Option<Box<dyn Step<T>>> {
        self.steps.shift_remove(name)
    }

    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step on `input`, returning the last step's output
    ///
    /// With no steps the input is returned unchanged.
    #[instrument(skip_all, fields(process = %self.name))]
    pub fn run(&self, input: T) -> ProcessResult<T> {
        let mut state = input;
        for (name, step) in &self.steps {
            if !step.can_handle(&state) {
                warn!(step = %name, "Step cannot handle its input");
                return Err(ProcessError::Rejected {
                    process: self.name.clone(),
                    step: name.clone(),
                });
            }

            debug!(step = %name, "Running step");
            state = step.run(state).map_err(|source| {
                match &source {
                    StepError::Known { input, message } => {
                        gdt_logging::known_exception(&self.name, name, input, message)
                    }
                    StepError::Failed(message) => error!(step = %name, reason = %message, "Step failed"),
                }
                ProcessError::StepFailed {
                    process: self.name.clone(),
                    step: name.clone(),
                    source,
                }
            })?;
        }

        info!(steps = self.steps.len(), "Process complete");
        Ok(state)
    }
}

impl<T> fmt::Debug for Process<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("name", &self.name)
            .field("steps", &self.steps.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> fmt::Display for Process<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The {} process contains {} steps.", self.name, self.steps.len())?;
        if let Some(last) = self.steps.keys().last() {
            writeln!(f, "These are:")?;
            for name in self.steps.keys() {
                writeln!(f, "    {name}")?;
            }
            write!(f, "The process will return the outputs of {last}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::FnStep;

    fn add(name: &str, amount: i64) -> FnStep<i64> {
        FnStep::new(name, move |x| Ok(x + amount))
    }

    #[test]
    fn test_replacing_a_step_keeps_its_position() {
        let mut process = Process::new("p").with_step(add("a", 1)).with_step(add("b", 2));
        let replaced = process.add_step(add("a", 10));

        assert!(replaced.is_some());
        assert_eq!(process.step_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(process.run(0).unwrap(), 12);
    }

    #[test]
    fn test_drop_step() {
        let mut process = Process::new("p")
            .with_step(add("a", 1))
            .with_step(add("b", 2))
            .with_step(add("c", 4));
        assert!(process.drop_step("b").is_some());
        assert!(process.drop_step("b").is_none());
        assert_eq!(process.step_names().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_empty_process_returns_input() {
        let process: Process<i64> = Process::new("noop");
        assert!(process.is_empty());
        assert_eq!(process.run(7).unwrap(), 7);
    }

    #[test]
    fn test_display_summary() {
        let process = Process::new("collars").with_step(add("read", 0)).with_step(add("clean", 0));
        assert_eq!(
            process.to_string(),
            "The collars process contains 2 steps.\nThese are:\n    read\n    clean\n\
             The process will return the outputs of clean"
        );
    }
}
