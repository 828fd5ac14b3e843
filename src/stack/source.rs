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

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::stack::StackFormat;

// SAFETY: the patterns are literals and known to compile.
static FIREFOX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bFirefox/[0-9.]+\b").unwrap());
static CHROME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bChrome/[0-9.]+\b").unwrap());
static BACKTRACE_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[0-9]+:\s+)?(\S.*)$").unwrap());
static BACKTRACE_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+at\s+(.+?):([0-9]+)(?::([0-9]+))?$").unwrap());

/// A native call-stack capture primitive.
pub trait StackSource: fmt::Debug + Send + Sync + 'static {
    /// Capture the current call stack as raw text lines, innermost first.
    ///
    /// The first line stands for the frame of the capture call itself.
    fn capture(&self) -> Vec<String>;

    /// The text format of the captured lines, or `None` if the host is not recognized.
    ///
    /// Read once, when the logger is built.
    fn format(&self) -> Option<StackFormat>;
}

/// The host a script stack comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Browser {
    /// Mozilla Firefox.
    Firefox,
    /// Google Chrome and Chromium derivatives.
    Chrome,
    /// An OBS browser source.
    Obs,
    /// Anything else.
    Unknown,
}

impl Browser {
    /// Identify the host from its user agent and whether an OBS source object is present.
    ///
    /// ```
    /// use stacklog::stack::Browser;
    ///
    /// let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
    /// assert_eq!(Browser::detect(ua, false), Browser::Firefox);
    /// ```
    pub fn detect(user_agent: &str, obs_source: bool) -> Browser {
        if FIREFOX.is_match(user_agent) {
            Browser::Firefox
        } else if CHROME.is_match(user_agent) {
            Browser::Chrome
        } else if obs_source {
            Browser::Obs
        } else {
            Browser::Unknown
        }
    }

    /// The stack-trace format this host prints, if it is supported.
    pub fn stack_format(self) -> Option<StackFormat> {
        match self {
            Browser::Chrome => Some(StackFormat::V8),
            Browser::Firefox => Some(StackFormat::Gecko),
            Browser::Obs | Browser::Unknown => None,
        }
    }
}

/// Stack source for a script host: a closure returning the host's raw stack text.
///
/// ```
/// use stacklog::stack::Browser;
/// use stacklog::stack::ScriptStack;
/// use stacklog::stack::StackSource;
///
/// let source = ScriptStack::new(Browser::Firefox, || "capture@a.js:1:1\nmain@a.js:9:1".to_string());
/// assert_eq!(source.capture(), ["capture@a.js:1:1", "main@a.js:9:1"]);
/// ```
pub struct ScriptStack {
    browser: Browser,
    stack: Box<dyn Fn() -> String + Send + Sync + 'static>,
}

impl fmt::Debug for ScriptStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptStack")
            .field("browser", &self.browser)
            .finish_non_exhaustive()
    }
}

impl ScriptStack {
    /// Create a source for `browser` that reads the stack text from `stack`.
    pub fn new(browser: Browser, stack: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            browser,
            stack: Box::new(stack),
        }
    }

    /// The host this source was created for.
    pub fn browser(&self) -> Browser {
        self.browser
    }
}

impl StackSource for ScriptStack {
    fn capture(&self) -> Vec<String> {
        let text = (self.stack)();
        text.trim().split('\n').map(str::to_string).collect()
    }

    fn format(&self) -> Option<StackFormat> {
        self.browser.stack_format()
    }
}

/// Stack source backed by [`std::backtrace::Backtrace`].
///
/// Frames are rendered in the Gecko format (`name@file:line:column`) since Rust symbols can
/// contain spaces. Frames without a source location are skipped. The backtrace machinery is
/// dropped, and the run of this crate's own frames on top is reduced to two lines: the capture
/// frame and the frame that entered the logger.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct NativeStack;

impl NativeStack {
    fn frames(text: &str) -> Vec<(String, String)> {
        let mut frames = vec![];
        let mut symbol: Option<&str> = None;
        for line in text.lines() {
            if let Some(caps) = BACKTRACE_LOCATION.captures(line) {
                // only the first location of a symbol
                let Some(name) = symbol.take() else {
                    continue;
                };
                let file = &caps[1];
                let line = &caps[2];
                let column = caps.get(3).map_or("0", |m| m.as_str());
                frames.push((name.to_string(), format!("{file}:{line}:{column}")));
            } else if let Some(caps) = BACKTRACE_SYMBOL.captures(line) {
                // inlined symbols continue the frame without an index
                symbol = caps.get(1).map(|m| m.as_str().trim());
            }
        }
        frames
    }

    fn render(frames: Vec<(String, String)>) -> Vec<String> {
        let crate_prefix = concat!(env!("CARGO_CRATE_NAME"), "::");
        let is_machinery = |name: &str| {
            name.starts_with("std::backtrace")
                || name.starts_with("<std::backtrace")
                || name.starts_with("backtrace::")
        };
        let is_internal = |name: &str| {
            let name = name.strip_prefix('<').unwrap_or(name);
            name.starts_with(crate_prefix)
        };

        let mut frames = frames
            .into_iter()
            .skip_while(|(name, _)| is_machinery(name))
            .peekable();

        let mut internal = vec![];
        while let Some(frame) = frames.next_if(|(name, _)| is_internal(name)) {
            internal.push(frame);
        }

        let mut lines = vec![];
        if let (Some(innermost), Some(outermost)) = (internal.first(), internal.last()) {
            lines.push(format!("{}@{}", innermost.0, innermost.1));
            lines.push(format!("{}@{}", outermost.0, outermost.1));
        }
        lines.extend(frames.map(|(name, location)| format!("{name}@{location}")));
        lines
    }
}

impl StackSource for NativeStack {
    fn capture(&self) -> Vec<String> {
        let backtrace = Backtrace::force_capture();
        Self::render(Self::frames(&backtrace.to_string()))
    }

    fn format(&self) -> Option<StackFormat> {
        Some(StackFormat::Gecko)
    }
}
