// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use crate::Severity;
use crate::append::Append;
use crate::append::Console;
use crate::filter::Filter;
use crate::filter::FilterChain;
use crate::hook::Hook;
use crate::hook::HookDispatcher;
use crate::logger::Logger;
use crate::logger::set_logger;
use crate::severity::SeverityRegistry;
use crate::severity::Verbosity;
use crate::stack::NativeStack;
use crate::stack::StackSource;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Create a new [`Builder`] with no sinks, the native stack source and the default verbosity.
///
/// # Examples
///
/// ```
/// use stacklog::append;
///
/// let logger = stacklog::builder()
///     .append(append::Stderr::default())
///     .build();
/// ```
pub fn builder() -> Builder {
    Builder {
        appends: vec![],
        trap: Box::new(DefaultTrap::default()),
        source: Box::new(NativeStack),
        verbosity: Verbosity::default(),
        hooks: HookDispatcher::default(),
        filters: FilterChain::default(),
    }
}

/// A builder for configuring a [`Logger`] and optionally installing it process-wide.
///
/// # Examples
///
/// ```
/// use stacklog::Severity;
/// use stacklog::Verbosity;
/// use stacklog::append;
/// use stacklog::filter::CustomFilter;
///
/// let logger = stacklog::builder()
///     .verbosity(Verbosity::Debug)
///     .filter(CustomFilter::new(|args| args.is_empty()), Severity::All)
///     .append(append::Console::default())
///     .build();
/// ```
#[must_use = "call `apply` to set the process-wide logger or `build` to construct a logger instance"]
#[derive(Debug)]
pub struct Builder {
    appends: Vec<Box<dyn Append>>,
    trap: Box<dyn Trap>,
    source: Box<dyn StackSource>,
    verbosity: Verbosity,
    hooks: HookDispatcher,
    filters: FilterChain,
}

impl Builder {
    /// Add a sink. Without any, [`build`](Self::build) falls back to a [`Console`].
    pub fn append(mut self, append: impl Into<Box<dyn Append>>) -> Self {
        self.appends.push(append.into());
        self
    }

    /// Set where sink failures are reported. Defaults to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Set the stack capture primitive. Defaults to [`NativeStack`].
    ///
    /// The frame format of the source is probed once here.
    pub fn stack_source(mut self, source: impl StackSource) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Set the initial verbosity knob.
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Register a hook before the logger is live.
    pub fn hook(self, hook: impl Hook, severity: Severity) -> Self {
        self.hooks.add(hook, severity);
        self
    }

    /// Register a filter before the logger is live.
    pub fn filter(self, filter: impl Filter, severity: Severity) -> Self {
        self.filters.add(filter, severity);
        self
    }

    /// Build the [`Logger`].
    pub fn build(self) -> Logger {
        let mut appends = self.appends;
        if appends.is_empty() {
            appends.push(Box::new(Console::default()));
        }

        Logger::new(
            SeverityRegistry::new(self.verbosity),
            self.filters,
            self.hooks,
            self.source,
            appends,
            self.trap,
        )
    }

    /// Install the built logger as the process-wide instance.
    ///
    /// This should be called early in the execution of a program. The free functions used before
    /// it install a default logger, after which this fails.
    ///
    /// # Errors
    ///
    /// Return the logger back if a process-wide logger has already been set.
    ///
    /// # Examples
    ///
    /// ```
    /// if stacklog::builder().try_apply().is_err() {
    ///     eprintln!("failed to set logger");
    /// }
    /// ```
    pub fn try_apply(self) -> Result<(), Logger> {
        set_logger(self.build())
    }

    /// Install the built logger as the process-wide instance.
    ///
    /// # Panics
    ///
    /// Panic if the process-wide logger has already been set.
    ///
    /// # Examples
    ///
    /// ```
    /// stacklog::builder().apply();
    /// ```
    pub fn apply(self) {
        self.try_apply()
            .expect("Builder::apply must be called before the process-wide logger is initialized");
    }
}
