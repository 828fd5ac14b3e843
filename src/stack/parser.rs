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

use std::fmt;
use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use crate::stack::StackFrame;

// SAFETY: the patterns are literals and known to compile.
static V8_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*at ([^ ]+)(?: \[as (\w+)\])? \((.*):([0-9]+):([0-9]+)\)$").unwrap()
});
static GECKO_FRAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^@]*)@(.*):([0-9]+):([0-9]+)$").unwrap());

/// The stack-trace text formats the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackFormat {
    /// `    at name [as alias] (file:line:column)`, as printed by V8 (Chrome).
    V8,
    /// `name@file:line:column`, as printed by Gecko (Firefox).
    Gecko,
}

impl StackFormat {
    /// The parser for this format.
    pub fn parser(self) -> Box<dyn FrameParser> {
        match self {
            StackFormat::V8 => Box::new(V8FrameParser),
            StackFormat::Gecko => Box::new(GeckoFrameParser),
        }
    }
}

/// Parses one raw stack-trace line into a frame.
pub trait FrameParser: fmt::Debug + Send + Sync + 'static {
    /// Returns `None` if the line is not in this parser's format.
    fn try_parse(&self, line: &str) -> Option<StackFrame>;
}

/// Parser for V8 stack lines: `    at name [as alias] (file:line:column)`.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct V8FrameParser;

impl FrameParser for V8FrameParser {
    fn try_parse(&self, line: &str) -> Option<StackFrame> {
        let caps = V8_FRAME.captures(line)?;
        Some(StackFrame {
            name: caps[1].to_string(),
            alias: caps.get(2).map(|m| m.as_str().to_string()),
            file: caps[3].to_string(),
            line: number(&caps, 4)?,
            column: number(&caps, 5)?,
        })
    }
}

/// Parser for Gecko stack lines: `name@file:line:column`.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct GeckoFrameParser;

impl FrameParser for GeckoFrameParser {
    fn try_parse(&self, line: &str) -> Option<StackFrame> {
        let caps = GECKO_FRAME.captures(line)?;
        Some(StackFrame {
            name: caps[1].to_string(),
            alias: None,
            file: caps[2].to_string(),
            line: number(&caps, 3)?,
            column: number(&caps, 4)?,
        })
    }
}

fn number(caps: &Captures, i: usize) -> Option<u32> {
    caps.get(i)?.as_str().parse().ok()
}

/// Turns captured lines into frames with the parser chosen once for the host format.
///
/// Without a known format no parser is installed and every stack parses to zero frames.
#[derive(Debug)]
pub struct StackParser {
    parser: Option<Box<dyn FrameParser>>,
}

impl StackParser {
    /// Create a parser for `format`; `None` means the host format is not supported.
    pub fn new(format: Option<StackFormat>) -> Self {
        Self {
            parser: format.map(StackFormat::parser),
        }
    }

    /// Create a parser around a custom [`FrameParser`].
    pub fn with_parser(parser: impl FrameParser) -> Self {
        Self {
            parser: Some(Box::new(parser)),
        }
    }

    /// Whether a frame parser is installed.
    pub fn is_supported(&self) -> bool {
        self.parser.is_some()
    }

    /// Parse every line; each line that does not match is passed to `unparsed` and dropped.
    pub fn parse<S, F>(&self, lines: &[S], mut unparsed: F) -> Vec<StackFrame>
    where
        S: AsRef<str>,
        F: FnMut(&str),
    {
        let Some(parser) = self.parser.as_ref() else {
            return vec![];
        };

        let mut frames = Vec::with_capacity(lines.len());
        for line in lines {
            let line = line.as_ref();
            match parser.try_parse(line) {
                Some(frame) => frames.push(frame),
                None => unparsed(line),
            }
        }
        frames
    }
}
