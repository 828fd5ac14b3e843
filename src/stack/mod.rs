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

//! Capturing, parsing, compacting and formatting call stacks.
//!
//! A traced log call goes through:
//!
//! 1. [`StackCapturer::capture`]: raw lines from a [`StackSource`], trimmed by the current trim
//!    levels;
//! 2. [`StackParser::parse`]: one [`StackFrame`] per line the host format understands;
//! 3. [`format_stack`]: file paths compacted across all frames, one `name@file:line:column` per
//!    line.

use std::fmt;

pub use self::capture::StackCapturer;
pub use self::capture::TrimGuard;
pub use self::format::format_stack;
pub use self::parser::FrameParser;
pub use self::parser::GeckoFrameParser;
pub use self::parser::StackFormat;
pub use self::parser::StackParser;
pub use self::parser::V8FrameParser;
pub use self::path::compact_paths;
pub use self::path::join_path;
pub use self::path::split_path;
pub use self::source::Browser;
pub use self::source::NativeStack;
pub use self::source::ScriptStack;
pub use self::source::StackSource;
pub use self::trim::TrimEdge;
pub use self::trim::TrimStack;

mod capture;
mod format;
mod parser;
mod path;
mod source;
mod trim;

/// One parsed entry of a call stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    /// The function name as the host printed it.
    pub name: String,
    /// The name the function was invoked as, when the host reports one (`[as alias]`).
    pub alias: Option<String>,
    /// The file or URL of the frame.
    pub file: String,
    /// The line number.
    pub line: u32,
    /// The column number.
    pub column: u32,
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}:{}", self.name, self.file, self.line, self.column)
    }
}
