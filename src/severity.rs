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

//! Severity levels and the verbosity knob that decides which of them are enabled.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::Error;

/// The default environment variable read by [`Verbosity::from_default_env`].
pub const DEFAULT_VERBOSITY_ENV: &str = "STACKLOG_VERBOSITY";

/// The severity of a log record.
///
/// From least to most severe:
///
/// - `Trace`
/// - `Debug`
/// - `Info`
/// - `Warn`
/// - `Error`
///
/// `All` is not a level of its own. It is the key that hooks and filters are registered under
/// when they should apply to every level, and it orders above every concrete severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// The "trace" level.
    Trace = 1,
    /// The "debug" level.
    Debug = 2,
    /// The "info" level.
    Info = 3,
    /// The "warn" level.
    Warn = 4,
    /// The "error" level.
    Error = 5,
    /// Every level. Only meaningful for registration.
    All = 6,
}

impl Severity {
    /// The five concrete severities, least severe first.
    pub const LEVELS: [Severity; 5] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// The upper-case name of this severity.
    pub const fn name(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::All => "ALL",
        }
    }

    /// The numeric value of this severity; `All` has the largest.
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Whether this is one of the five concrete levels (anything but `All`).
    pub const fn is_level(self) -> bool {
        !matches!(self, Severity::All)
    }

    /// Whether an entry registered under `self` applies to a record of `severity`.
    ///
    /// `All` applies to every record; a concrete key applies to records at least as severe.
    // NOTE: a concrete key covers its own level and the more severe ones, not the less severe
    // ones. Flipping the comparison changes which calls every registered filter sees.
    pub fn covers(self, severity: Severity) -> bool {
        self == Severity::All || severity >= self
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Severity::Trace,
            Severity::Debug,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
            Severity::All,
        ]
        .into_iter()
        .find(|severity| severity.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| Error::invalid_severity(s))
    }
}

impl TryFrom<&str> for Severity {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Error> {
        s.parse()
    }
}

impl TryFrom<&String> for Severity {
    type Error = Error;

    fn try_from(s: &String) -> Result<Self, Error> {
        s.parse()
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warn,
            log::Level::Info => Severity::Info,
            log::Level::Debug => Severity::Debug,
            log::Level::Trace => Severity::Trace,
        }
    }
}

/// The process-wide verbosity knob.
///
/// | Verbosity | Enabled severities |
/// |---|---|
/// | `Trace` | all |
/// | `Debug` | `Debug` and above |
/// | `Off` | `Info` and above |
/// | `Default` | `Warn` and above |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// No explicit setting: `Warn` and above.
    #[default]
    Default,
    /// Extra verbosity turned off: `Info` and above.
    Off,
    /// `Debug` and above.
    Debug,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Whether `severity` is enabled under this verbosity.
    ///
    /// Only concrete levels are ever enabled; `All` is not a level.
    pub fn enables(self, severity: Severity) -> bool {
        if !severity.is_level() {
            return false;
        }
        let floor = match self {
            Verbosity::Trace => Severity::Trace,
            Verbosity::Debug => Severity::Debug,
            Verbosity::Off => Severity::Info,
            Verbosity::Default => Severity::Warn,
        };
        severity >= floor
    }

    /// Read the verbosity from the environment using the default variable name
    /// `STACKLOG_VERBOSITY`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stacklog::Verbosity;
    ///
    /// let verbosity = Verbosity::from_default_env();
    /// ```
    pub fn from_default_env() -> Self {
        Verbosity::from_env(DEFAULT_VERBOSITY_ENV)
    }

    /// Read the verbosity from the environment variable `name`.
    ///
    /// Unset or unrecognized values yield [`Verbosity::Default`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stacklog::Verbosity;
    ///
    /// let verbosity = Verbosity::from_env("MY_APP_VERBOSITY");
    /// ```
    pub fn from_env<'a, E>(name: E) -> Self
    where
        E: Into<Cow<'a, str>>,
    {
        let name = name.into();
        std::env::var(&*name)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    const fn to_u8(self) -> u8 {
        match self {
            Verbosity::Default => 0,
            Verbosity::Off => 1,
            Verbosity::Debug => 2,
            Verbosity::Trace => 3,
        }
    }

    const fn from_u8(v: u8) -> Self {
        match v {
            1 => Verbosity::Off,
            2 => Verbosity::Debug,
            3 => Verbosity::Trace,
            _ => Verbosity::Default,
        }
    }
}

impl FromStr for Verbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("off") || s == "0" {
            Ok(Verbosity::Off)
        } else if s.eq_ignore_ascii_case("debug") || s == "1" {
            Ok(Verbosity::Debug)
        } else if s.eq_ignore_ascii_case("trace") || s == "2" {
            Ok(Verbosity::Trace)
        } else if s.eq_ignore_ascii_case("default") || s.eq_ignore_ascii_case("warn") {
            Ok(Verbosity::Default)
        } else {
            Err(Error::new("invalid verbosity").with_context("verbosity", s))
        }
    }
}

/// Answers whether a severity is currently enabled, based on a mutable [`Verbosity`].
#[derive(Debug, Default)]
pub struct SeverityRegistry {
    verbosity: AtomicU8,
}

impl SeverityRegistry {
    /// Create a registry starting at `verbosity`.
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity: AtomicU8::new(verbosity.to_u8()),
        }
    }

    /// The current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_u8(self.verbosity.load(Ordering::Relaxed))
    }

    /// Change the verbosity; takes effect for the next log call.
    pub fn set_verbosity(&self, verbosity: Verbosity) {
        self.verbosity.store(verbosity.to_u8(), Ordering::Relaxed);
    }

    /// Whether `severity` is enabled under the current verbosity.
    pub fn is_enabled(&self, severity: Severity) -> bool {
        self.verbosity().enables(severity)
    }
}
