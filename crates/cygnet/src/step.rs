// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Processing steps.

use std::fmt;

use crate::error::StepResult;

/// One stage of a cygnet process
///
/// A step first decides whether it can take an input at all, then turns it
/// into the input of the next step.
pub trait Step<T> {
    /// Identifier, unique within a process
    fn name(&self) -> &str;

    /// Whether `input` is something this step knows how to process
    fn can_handle(&self, input: &T) -> bool;

    fn run(&self, input: T) -> StepResult<T>;
}

impl<T, S: Step<T> + ?Sized> Step<T> for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn can_handle(&self, input: &T) -> bool {
        (**self).can_handle(input)
    }

    fn run(&self, input: T) -> StepResult<T> {
        (**self).run(input)
    }
}

type Check<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Action<T> = Box<dyn Fn(T) -> StepResult<T> + Send + Sync>;

/// A step built from closures
pub struct FnStep<T> {
    name: String,
    check: Check<T>,
    action: Action<T>,
}

impl<T: 'static> FnStep<T> {
    /// Step that accepts every input
    pub fn new(
        name: impl Into<String>,
        action: impl Fn(T) -> StepResult<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Box::new(|_: &T| true),
            action: Box::new(action),
        }
    }

    pub fn with_check(mut self, check: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.check = Box::new(check);
        self
    }
}

impl<T> fmt::Debug for FnStep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<T> Step<T> for FnStep<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_handle(&self, input: &T) -> bool {
        (self.check)(input)
    }

    fn run(&self, input: T) -> StepResult<T> {
        (self.action)(input)
    }
}
