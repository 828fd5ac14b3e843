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


//! A bridge to forward logs from the `log` crate to the process-wide stacklog logger.
//!
//! Records enter the pipeline as calls without a stack trace, so they share the verbosity knob,
//! the filters and the hooks with direct calls. The message is the record's formatted arguments.

use crate::Severity;
use crate::Value;
use crate::logger::logger;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        logger().is_enabled(Severity::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let message = record.args().to_string();
        let args = [Value::from(message.as_str())];
        logger().log(Severity::from(record.level()), &args, false);
    }

    fn flush(&self) {
        logger().flush();
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and
/// all logs from log crate will be forwarded to the process-wide stacklog logger.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function. The verbosity knob still applies.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// if let Err(err) = stacklog::bridge::log::try_setup_log_crate() {
///     eprintln!("failed to setup log crate: {err}");
/// }
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and
/// all logs from log crate will be forwarded to the process-wide stacklog logger.
///
/// This function will panic if it is called more than once, or if another library has already
/// initialized the log crate global logger.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// stacklog::bridge::log::setup_log_crate();
/// log::warn!("forwarded");
/// ```
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "stacklog::bridge::log::setup_log_crate must be called before the log crate global logger initialized",
    );
}
