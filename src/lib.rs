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


//! Stacklog is a severity-gated diagnostic logging pipeline that can attach a compact call stack
//! to each message.
//!
//! # Overview
//!
//! Every call goes through the same steps:
//!
//! 1. the verbosity gate drops severities the current [`Verbosity`] disables;
//! 2. [filters](filter) may veto the call by inspecting its arguments;
//! 3. [hooks](hook) observe the severity, whether a trace was asked for and the arguments;
//! 4. the [sinks](append) receive a [`Record`], carrying the caller's stack compacted to one
//!    `name@file:line:column` line per frame for the traced entry points.
//!
//! The five traced entry points ([`log_trace`] .. [`log_error`]) and five plain ones
//! ([`log_trace_only`] .. [`log_error_only`]) drive the process-wide [`Logger`]; the macros
//! below wrap them for variadic arguments.
//!
//! # Examples
//!
//! Use the process-wide logger, configured with the defaults:
//!
//! ```
//! stacklog::warn_only!("disk almost full:", 93);
//! stacklog::error!("cannot open", "settings.toml");
//! ```
//!
//! Build an isolated logger with a hook and a filter:
//!
//! ```
//! use stacklog::Severity;
//! use stacklog::Value;
//! use stacklog::Verbosity;
//! use stacklog::append::Testing;
//! use stacklog::filter::CustomFilter;
//! use stacklog::hook::CustomHook;
//!
//! let logger = stacklog::builder()
//!     .verbosity(Verbosity::Debug)
//!     .append(Testing::default())
//!     .build();
//!
//! logger.add_filter(
//!     CustomFilter::new(|args| args.first().and_then(|v| v.to_borrowed_str()) == Some("noise")),
//!     Severity::All,
//! );
//! logger.add_hook(
//!     CustomHook::new(|severity, _, args| eprintln!("[{severity}] {} args", args.len())),
//!     "WARN",
//! );
//!
//! logger.warn_only(&[Value::from("heads up")]);
//! logger.debug(&[Value::from("noise")]);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod filter;
pub mod hook;
pub mod layout;
pub mod record;
pub mod stack;
pub mod trap;

mod error;
pub use self::error::Error;

mod severity;
pub use self::severity::DEFAULT_VERBOSITY_ENV;
pub use self::severity::Severity;
pub use self::severity::SeverityRegistry;
pub use self::severity::Verbosity;

mod value;
pub use self::value::Value;
pub use self::value::join_args;

mod logger;
pub use self::logger::*;

pub use self::append::Append;
pub use self::filter::Filter;
pub use self::hook::Hook;
pub use self::layout::Layout;
pub use self::record::Record;
pub use self::stack::StackFrame;
pub use self::trap::Trap;

#[doc(hidden)]
#[macro_export]
macro_rules! __stacklog_call {
    ($func:ident, $($arg:expr),* $(,)?) => {
        $crate::$func(&[$($crate::Value::from($arg)),*])
    };
}

/// Log at `Trace` with the caller's stack through the process-wide logger.
///
/// Each argument must convert into a [`Value`].
#[macro_export]
macro_rules! trace {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_trace, $($arg),*) };
}

/// Log at `Debug` with the caller's stack through the process-wide logger.
#[macro_export]
macro_rules! debug {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_debug, $($arg),*) };
}

/// Log at `Info` with the caller's stack through the process-wide logger.
#[macro_export]
macro_rules! info {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_info, $($arg),*) };
}

/// Log at `Warn` with the caller's stack through the process-wide logger.
#[macro_export]
macro_rules! warn {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_warn, $($arg),*) };
}

/// Log at `Error` with the caller's stack through the process-wide logger.
#[macro_export]
macro_rules! error {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_error, $($arg),*) };
}

/// Log at `Trace` without a stack through the process-wide logger.
#[macro_export]
macro_rules! trace_only {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_trace_only, $($arg),*) };
}

/// Log at `Debug` without a stack through the process-wide logger.
#[macro_export]
macro_rules! debug_only {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_debug_only, $($arg),*) };
}

/// Log at `Info` without a stack through the process-wide logger.
#[macro_export]
macro_rules! info_only {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_info_only, $($arg),*) };
}

/// Log at `Warn` without a stack through the process-wide logger.
#[macro_export]
macro_rules! warn_only {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_warn_only, $($arg),*) };
}

/// Log at `Error` without a stack through the process-wide logger.
#[macro_export]
macro_rules! error_only {
    ($($arg:expr),* $(,)?) => { $crate::__stacklog_call!(log_error_only, $($arg),*) };
}
