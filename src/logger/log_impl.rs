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


use crate::Error;
use crate::Severity;
use crate::Value;
use crate::append::Append;
use crate::filter::Filter;
use crate::filter::FilterChain;
use crate::hook::Hook;
use crate::hook::HookDispatcher;
use crate::record::Record;
use crate::severity::SeverityRegistry;
use crate::severity::Verbosity;
use crate::stack::StackCapturer;
use crate::stack::StackFrame;
use crate::stack::StackParser;
use crate::stack::StackSource;
use crate::stack::TrimEdge;
use crate::stack::TrimGuard;
use crate::stack::format_stack;
use crate::trap::Trap;

/// The logging facade: verbosity gate, filters, hooks, stack capture and sinks.
///
/// A `Logger` is an explicitly constructed context. Most programs use the process-wide one
/// through the free functions ([`log_warn`](crate::log_warn), [`add_hook`](crate::add_hook), ...),
/// while tests construct their own with [`builder`](crate::builder).
///
/// # Examples
///
/// ```
/// use stacklog::Value;
/// use stacklog::append::Testing;
///
/// let logger = stacklog::builder().append(Testing::default()).build();
/// logger.warn_only(&[Value::from("disk almost full:"), Value::from(93)]);
/// ```
#[derive(Debug)]
pub struct Logger {
    severities: SeverityRegistry,
    filters: FilterChain,
    hooks: HookDispatcher,
    capturer: StackCapturer,
    parser: StackParser,
    appends: Vec<Box<dyn Append>>,
    trap: Box<dyn Trap>,
}

impl Logger {
    pub(super) fn new(
        severities: SeverityRegistry,
        filters: FilterChain,
        hooks: HookDispatcher,
        source: Box<dyn StackSource>,
        appends: Vec<Box<dyn Append>>,
        trap: Box<dyn Trap>,
    ) -> Self {
        debug_assert!(!appends.is_empty(), "a Logger must have at least one append");

        let parser = StackParser::new(source.format());
        Self {
            severities,
            filters,
            hooks,
            capturer: StackCapturer::new(source),
            parser,
            appends,
            trap,
        }
    }

    /// The current verbosity knob.
    pub fn verbosity(&self) -> Verbosity {
        self.severities.verbosity()
    }

    /// Set the verbosity knob. Takes effect for every subsequent call.
    pub fn set_verbosity(&self, verbosity: Verbosity) {
        self.severities.set_verbosity(verbosity);
    }

    /// Whether calls at `severity` pass the verbosity gate.
    ///
    /// An unknown severity name, or [`Severity::All`], is reported on the error channel and
    /// yields `false`.
    pub fn is_enabled<S>(&self, severity: S) -> bool
    where
        S: TryInto<Severity>,
        S::Error: Into<Error>,
    {
        match self.resolve(severity) {
            Some(severity) if severity.is_level() => self.severities.is_enabled(severity),
            Some(severity) => {
                self.report(&Error::invalid_severity(severity));
                false
            }
            None => false,
        }
    }

    /// Register a hook under `severity`.
    ///
    /// Returns `false`, after reporting on the error channel, if the severity is unknown.
    pub fn add_hook<S>(&self, hook: impl Hook, severity: S) -> bool
    where
        S: TryInto<Severity>,
        S::Error: Into<Error>,
    {
        let Some(severity) = self.resolve(severity) else {
            return false;
        };
        self.hooks.add(hook, severity);
        true
    }

    /// Register a filter under `severity`.
    ///
    /// Returns `false`, after reporting on the error channel, if the severity is unknown.
    pub fn add_filter<S>(&self, filter: impl Filter, severity: S) -> bool
    where
        S: TryInto<Severity>,
        S::Error: Into<Error>,
    {
        let Some(severity) = self.resolve(severity) else {
            return false;
        };
        self.filters.add(filter, severity);
        true
    }

    /// Whether a call with `args` at `severity` would be suppressed by a filter.
    pub fn should_suppress(&self, args: &[Value], severity: Severity) -> bool {
        self.filters.should_suppress(args, severity)
    }

    /// The current number of lines hidden from the top of captured stacks.
    pub fn trim_begin(&self) -> usize {
        self.capturer.trim(TrimEdge::Begin)
    }

    /// Hide `level` lines from the top of captured stacks until the matching pop.
    pub fn push_trim_begin(&self, level: usize) {
        self.capturer.push_trim(TrimEdge::Begin, level);
    }

    /// Restore the previous top trim level. Popping the base level is a no-op.
    pub fn pop_trim_begin(&self) {
        self.capturer.pop_trim(TrimEdge::Begin);
    }

    /// The current number of lines hidden from the bottom of captured stacks.
    pub fn trim_end(&self) -> usize {
        self.capturer.trim(TrimEdge::End)
    }

    /// Hide `level` lines from the bottom of captured stacks until the matching pop.
    pub fn push_trim_end(&self, level: usize) {
        self.capturer.push_trim(TrimEdge::End, level);
    }

    /// Restore the previous bottom trim level. Popping the base level is a no-op.
    pub fn pop_trim_end(&self) {
        self.capturer.pop_trim(TrimEdge::End);
    }

    /// Hide `level` lines from the top of captured stacks while the guard lives.
    ///
    /// A helper that wraps the facade uses this to keep its own frame out of the traces it
    /// produces. Traced calls already hide at least one frame, so the helper goes one above
    /// that floor:
    ///
    /// ```
    /// use stacklog::Logger;
    /// use stacklog::Value;
    ///
    /// fn warn_twice(logger: &Logger, what: &str) {
    ///     let _hidden = logger.hide_frames_begin(logger.trim_begin().max(1) + 1);
    ///     logger.warn(&[Value::from(what)]);
    ///     logger.warn(&[Value::from(what)]);
    /// }
    /// ```
    pub fn hide_frames_begin(&self, level: usize) -> TrimGuard<'_> {
        self.capturer.hide(TrimEdge::Begin, level)
    }

    /// Hide `level` lines from the bottom of captured stacks while the guard lives.
    pub fn hide_frames_end(&self, level: usize) -> TrimGuard<'_> {
        self.capturer.hide(TrimEdge::End, level)
    }

    /// Capture and parse the stack of the caller, honoring the current trim levels.
    ///
    /// Lines that do not parse are reported through [`error_only`](Self::error_only) and
    /// skipped.
    pub fn capture_stack(&self) -> Vec<StackFrame> {
        let level = self.capturer.trim(TrimEdge::Begin).saturating_add(1);
        let _guard = self.capturer.hide(TrimEdge::Begin, level);
        let lines = self.capturer.capture();
        self.parse(&lines)
    }

    /// Run one call through the pipeline.
    ///
    /// The call is dropped if `severity` is disabled or a filter suppresses `args`. Otherwise
    /// the hooks observe it, then the sinks receive it, with the formatted stack of the caller
    /// attached when `trace` is set.
    pub fn log(&self, severity: Severity, args: &[Value], trace: bool) {
        if !severity.is_level() {
            self.report(&Error::invalid_severity(severity));
            return;
        }
        if !self.severities.is_enabled(severity) {
            return;
        }
        if self.filters.should_suppress(args, severity) {
            return;
        }

        for err in self.hooks.dispatch(severity, trace, args) {
            self.report(&err);
        }

        if !trace {
            self.emit(&Record::new(severity, args));
            return;
        }

        // hide the facade's own frame, popped on every exit path
        let _guard = self.capturer.hide_at_least(TrimEdge::Begin, 1);
        let lines = self.capturer.capture();
        let frames = self.parse(&lines);
        let stack = format_stack(&frames);
        self.emit(&Record::new(severity, args).with_trace(&stack));
    }

    /// Log at `Trace` with the caller's stack.
    pub fn trace(&self, args: &[Value]) {
        self.log(Severity::Trace, args, true);
    }

    /// Log at `Debug` with the caller's stack.
    pub fn debug(&self, args: &[Value]) {
        self.log(Severity::Debug, args, true);
    }

    /// Log at `Info` with the caller's stack.
    pub fn info(&self, args: &[Value]) {
        self.log(Severity::Info, args, true);
    }

    /// Log at `Warn` with the caller's stack.
    pub fn warn(&self, args: &[Value]) {
        self.log(Severity::Warn, args, true);
    }

    /// Log at `Error` with the caller's stack.
    pub fn error(&self, args: &[Value]) {
        self.log(Severity::Error, args, true);
    }

    /// Log at `Trace` without stack work.
    pub fn trace_only(&self, args: &[Value]) {
        self.log(Severity::Trace, args, false);
    }

    /// Log at `Debug` without stack work.
    pub fn debug_only(&self, args: &[Value]) {
        self.log(Severity::Debug, args, false);
    }

    /// Log at `Info` without stack work.
    pub fn info_only(&self, args: &[Value]) {
        self.log(Severity::Info, args, false);
    }

    /// Log at `Warn` without stack work.
    pub fn warn_only(&self, args: &[Value]) {
        self.log(Severity::Warn, args, false);
    }

    /// Log at `Error` without stack work.
    pub fn error_only(&self, args: &[Value]) {
        self.log(Severity::Error, args, false);
    }

    /// Flush every sink.
    pub fn flush(&self) {
        for append in &self.appends {
            if let Err(err) = append.flush() {
                self.trap.trap(&err);
            }
        }
    }

    fn parse(&self, lines: &[String]) -> Vec<StackFrame> {
        self.parser.parse(lines, |line| {
            // never traced, or a bad line would recurse
            self.error_only(&[Value::from("failed to parse stack frame"), Value::from(line)]);
        })
    }

    fn resolve<S>(&self, severity: S) -> Option<Severity>
    where
        S: TryInto<Severity>,
        S::Error: Into<Error>,
    {
        match severity.try_into() {
            Ok(severity) => Some(severity),
            Err(err) => {
                self.report(&err.into());
                None
            }
        }
    }

    // straight to the error channel: no gate, no filters, no hooks
    fn report(&self, err: &Error) {
        let message = err.to_string();
        let args = [Value::from("stacklog:"), Value::from(message.as_str())];
        self.emit(&Record::new(Severity::Error, &args));
    }

    fn emit(&self, record: &Record) {
        for append in &self.appends {
            if let Err(err) = append.append(record) {
                let err = err.with_context("severity", record.severity());
                self.trap.trap(&err);
            }
        }
    }
}
