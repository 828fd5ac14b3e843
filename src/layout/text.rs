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

use std::fmt::Write;

use colored::Color;
use colored::ColoredString;
use colored::Colorize;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::Severity;
use crate::layout::Layout;
use crate::record::Record;

/// A layout that formats log record as optionally colored text.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172105+08:00 ERROR connection lost 3
/// 2024-08-11T22:44:57.172219+08:00  WARN disk usage 97
///   From check_disk@main.rs:12:5
///        main@main.rs:4:5
/// 2024-08-11T22:44:57.172276+08:00  INFO listening 8080
/// ```
///
/// The message is every argument displayed and separated by a space. The stack of a traced
/// call follows on indented lines.
///
/// # Examples
///
/// ```
/// use stacklog::layout::TextLayout;
///
/// let layout = TextLayout::default().no_color();
/// ```
#[derive(Debug, Clone)]
pub struct TextLayout {
    colors: LevelColor,
    no_color: bool,
    timezone: TimeZone,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            colors: LevelColor::default(),
            no_color: false,
            timezone: TimeZone::system(),
        }
    }
}

impl TextLayout {
    /// Customize the color of the error severity. Default to red.
    pub fn error_color(mut self, color: Color) -> Self {
        self.colors.error = color;
        self
    }

    /// Customize the color of the warn severity. Default to yellow.
    pub fn warn_color(mut self, color: Color) -> Self {
        self.colors.warn = color;
        self
    }

    /// Customize the color of the info severity. Default to green.
    pub fn info_color(mut self, color: Color) -> Self {
        self.colors.info = color;
        self
    }

    /// Customize the color of the debug severity. Default to blue.
    pub fn debug_color(mut self, color: Color) -> Self {
        self.colors.debug = color;
        self
    }

    /// Customize the color of the trace severity. Default to magenta.
    pub fn trace_color(mut self, color: Color) -> Self {
        self.colors.trace = color;
        self
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Set the timezone for timestamps. Defaults to the system timezone.
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use stacklog::layout::TextLayout;
    ///
    /// let layout = TextLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let ts = Timestamp::try_from(record.time())
            .map_err(|err| Error::new("failed to read record time").with_source(err))?;
        let offset = self.timezone.to_offset(ts);

        let level = self.colors.colorize(self.no_color, record.severity());
        let message = record.message();

        let mut text = String::new();
        write!(&mut text, "{:.6} {level} {message}", ts.display_with_offset(offset))
            .map_err(Error::from_fmt_error)?;

        if let Some(trace) = record.trace() {
            for (i, line) in trace.lines().enumerate() {
                let lead = if i == 0 { "  From " } else { "       " };
                write!(&mut text, "\n{lead}{line}").map_err(Error::from_fmt_error)?;
            }
        }

        Ok(text.into_bytes())
    }
}

/// Colors for the different severities.
#[derive(Debug, Clone)]
struct LevelColor {
    error: Color,
    warn: Color,
    info: Color,
    debug: Color,
    trace: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            error: Color::Red,
            warn: Color::Yellow,
            info: Color::Green,
            debug: Color::Blue,
            trace: Color::Magenta,
        }
    }
}

impl LevelColor {
    fn colorize(&self, no_color: bool, severity: Severity) -> ColoredString {
        let name = ColoredString::from(format!("{:>5}", severity.name()));
        if no_color {
            return name;
        }
        let color = match severity {
            Severity::Error | Severity::All => self.error,
            Severity::Warn => self.warn,
            Severity::Info => self.info,
            Severity::Debug => self.debug,
            Severity::Trace => self.trace,
        };
        name.color(color)
    }
}
