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


//! The logging facade and its process-wide instance.

use std::sync::OnceLock;

use crate::Error;
use crate::Severity;
use crate::Value;
use crate::filter::Filter;
use crate::hook::Hook;
use crate::severity::Verbosity;
use crate::stack::StackFrame;

pub use self::builder::Builder;
pub use self::builder::builder;
pub use self::log_impl::Logger;

mod builder;
mod log_impl;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger.
///
/// Installed by [`Builder::apply`]; if nothing was installed, the first use installs a logger
/// writing to the [`Console`](crate::append::Console), capturing stacks with
/// [`NativeStack`](crate::stack::NativeStack) and with the verbosity read from
/// `STACKLOG_VERBOSITY`.
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(|| builder().verbosity(Verbosity::from_default_env()).build())
}

/// Install `logger` as the process-wide logger.
///
/// # Errors
///
/// Return the logger back if one is already installed.
pub fn set_logger(logger: Logger) -> Result<(), Logger> {
    LOGGER.set(logger)
}

/// Log with the caller's stack at `Trace`.
pub fn log_trace(args: &[Value]) {
    logger().trace(args);
}

/// Log with the caller's stack at `Debug`.
pub fn log_debug(args: &[Value]) {
    logger().debug(args);
}

/// Log with the caller's stack at `Info`.
pub fn log_info(args: &[Value]) {
    logger().info(args);
}

/// Log with the caller's stack at `Warn`.
pub fn log_warn(args: &[Value]) {
    logger().warn(args);
}

/// Log with the caller's stack at `Error`.
pub fn log_error(args: &[Value]) {
    logger().error(args);
}

/// Log at `Trace` without capturing a stack.
pub fn log_trace_only(args: &[Value]) {
    logger().trace_only(args);
}

/// Log at `Debug` without capturing a stack.
pub fn log_debug_only(args: &[Value]) {
    logger().debug_only(args);
}

/// Log at `Info` without capturing a stack.
pub fn log_info_only(args: &[Value]) {
    logger().info_only(args);
}

/// Log at `Warn` without capturing a stack.
pub fn log_warn_only(args: &[Value]) {
    logger().warn_only(args);
}

/// Log at `Error` without capturing a stack.
pub fn log_error_only(args: &[Value]) {
    logger().error_only(args);
}

/// Register a hook on the process-wide logger. See [`Logger::add_hook`].
///
/// # Examples
///
/// ```
/// use stacklog::Severity;
/// use stacklog::hook::CustomHook;
///
/// let accepted = stacklog::add_hook(
///     CustomHook::new(|severity, _, args| {
///         println!("{severity}: {} args", args.len());
///     }),
///     Severity::All,
/// );
/// assert!(accepted);
/// assert!(!stacklog::add_hook(CustomHook::new(|_, _, _| {}), "LOUD"));
/// ```
pub fn add_hook<S>(hook: impl Hook, severity: S) -> bool
where
    S: TryInto<Severity>,
    S::Error: Into<Error>,
{
    logger().add_hook(hook, severity)
}

/// Register a filter on the process-wide logger. See [`Logger::add_filter`].
pub fn add_filter<S>(filter: impl Filter, severity: S) -> bool
where
    S: TryInto<Severity>,
    S::Error: Into<Error>,
{
    logger().add_filter(filter, severity)
}

/// Set the verbosity knob of the process-wide logger.
pub fn set_verbosity(verbosity: Verbosity) {
    logger().set_verbosity(verbosity);
}

/// Whether the process-wide logger passes calls at `severity`.
pub fn is_enabled<S>(severity: S) -> bool
where
    S: TryInto<Severity>,
    S::Error: Into<Error>,
{
    logger().is_enabled(severity)
}

/// Capture and parse the caller's stack with the process-wide logger.
pub fn capture_stack() -> Vec<StackFrame> {
    logger().capture_stack()
}
