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

use std::io::Write;

use crate::Error;
use crate::append::Append;
use crate::layout::Layout;
use crate::layout::TextLayout;
use crate::record::Channel;
use crate::record::Record;

fn write_line(mut w: impl Write, layout: &dyn Layout, record: &Record) -> Result<(), Error> {
    let mut bytes = layout.format(record)?;
    bytes.push(b'\n');
    w.write_all(&bytes).map_err(Error::from_io_error)
}

/// A sink shaped like a browser console: the log channel goes to stdout, the warn and error
/// channels to stderr.
///
/// # Examples
///
/// ```
/// use stacklog::append::Console;
///
/// let console = Console::default();
/// ```
#[derive(Debug)]
pub struct Console {
    layout: Box<dyn Layout>,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
        }
    }
}

impl Console {
    /// Set the layout.
    ///
    /// ```
    /// use stacklog::append::Console;
    /// use stacklog::layout::TextLayout;
    ///
    /// let console = Console::default().with_layout(TextLayout::default().no_color());
    /// ```
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Append for Console {
    fn append(&self, record: &Record) -> Result<(), Error> {
        match record.channel() {
            Channel::Log => write_line(std::io::stdout().lock(), self.layout.as_ref(), record),
            Channel::Warn | Channel::Error => {
                write_line(std::io::stderr().lock(), self.layout.as_ref(), record)
            }
        }
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stdout().flush().map_err(Error::from_io_error)?;
        std::io::stderr().flush().map_err(Error::from_io_error)
    }
}

/// A sink that prints every record to stdout.
///
/// # Examples
///
/// ```
/// use stacklog::Value;
/// use stacklog::append::Stdout;
/// use stacklog::layout::TextLayout;
///
/// let logger = stacklog::builder()
///     .append(Stdout::default().with_layout(TextLayout::default().no_color()))
///     .build();
/// logger.warn_only(&[Value::from("to stdout")]);
/// ```
#[derive(Debug)]
pub struct Stdout {
    layout: Box<dyn Layout>,
}

impl Default for Stdout {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
        }
    }
}

impl Stdout {
    /// Set the layout.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Append for Stdout {
    fn append(&self, record: &Record) -> Result<(), Error> {
        write_line(std::io::stdout().lock(), self.layout.as_ref(), record)
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stdout().flush().map_err(Error::from_io_error)
    }
}

/// A sink that prints every record to stderr.
#[derive(Debug)]
pub struct Stderr {
    layout: Box<dyn Layout>,
}

impl Default for Stderr {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
        }
    }
}

impl Stderr {
    /// Set the layout.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Append for Stderr {
    fn append(&self, record: &Record) -> Result<(), Error> {
        write_line(std::io::stderr().lock(), self.layout.as_ref(), record)
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stderr().flush().map_err(Error::from_io_error)
    }
}
