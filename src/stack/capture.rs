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

use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::stack::StackSource;
use crate::stack::TrimEdge;
use crate::stack::TrimStack;

#[derive(Debug, Default)]
struct TrimLevels {
    begin: TrimStack,
    end: TrimStack,
}

impl TrimLevels {
    fn edge(&mut self, edge: TrimEdge) -> &mut TrimStack {
        match edge {
            TrimEdge::Begin => &mut self.begin,
            TrimEdge::End => &mut self.end,
        }
    }
}

/// Captures the current call stack and applies the trim levels.
#[derive(Debug)]
pub struct StackCapturer {
    source: Box<dyn StackSource>,
    levels: Mutex<TrimLevels>,
}

impl StackCapturer {
    /// Create a capturer over `source` with both trim levels at zero.
    pub fn new(source: Box<dyn StackSource>) -> Self {
        Self {
            source,
            levels: Mutex::new(TrimLevels::default()),
        }
    }

    /// The underlying capture primitive.
    pub fn source(&self) -> &dyn StackSource {
        self.source.as_ref()
    }

    fn levels(&self) -> MutexGuard<'_, TrimLevels> {
        self.levels.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The current trim level at `edge`.
    pub fn trim(&self, edge: TrimEdge) -> usize {
        self.levels().edge(edge).current()
    }

    /// Push a new trim level at `edge`.
    pub fn push_trim(&self, edge: TrimEdge, level: usize) {
        self.levels().edge(edge).push(level);
    }

    /// Restore the previous trim level at `edge`; the base level is never popped.
    pub fn pop_trim(&self, edge: TrimEdge) {
        self.levels().edge(edge).pop();
    }

    /// Push `level` at `edge` until the returned guard is dropped.
    pub fn hide(&self, edge: TrimEdge, level: usize) -> TrimGuard<'_> {
        self.push_trim(edge, level);
        TrimGuard {
            capturer: self,
            edge,
        }
    }

    /// Like [`hide`](Self::hide), but never lowers the current level.
    pub fn hide_at_least(&self, edge: TrimEdge, level: usize) -> TrimGuard<'_> {
        {
            let mut levels = self.levels();
            let stack = levels.edge(edge);
            let level = level.max(stack.current());
            stack.push(level);
        }
        TrimGuard {
            capturer: self,
            edge,
        }
    }

    /// Capture the current stack as raw lines.
    ///
    /// The first line (this capture's own frame) is always dropped, then the current begin level
    /// from the top and the current end level from the bottom. Asking to trim more lines than
    /// there are yields an empty stack.
    pub fn capture(&self) -> Vec<String> {
        let lines = self.source.capture();
        let (begin, end) = {
            let levels = self.levels();
            (levels.begin.current(), levels.end.current())
        };
        trim_lines(lines, begin.saturating_add(1), end)
    }
}

fn trim_lines(mut lines: Vec<String>, begin: usize, end: usize) -> Vec<String> {
    if begin.saturating_add(end) >= lines.len() {
        return vec![];
    }
    lines.truncate(lines.len() - end);
    lines.drain(..begin);
    lines
}

/// Restores a trim level pushed by [`StackCapturer::hide`] when dropped, including during
/// unwinding.
#[derive(Debug)]
#[must_use = "the trim level is popped as soon as the guard is dropped"]
pub struct TrimGuard<'a> {
    capturer: &'a StackCapturer,
    edge: TrimEdge,
}

impl Drop for TrimGuard<'_> {
    fn drop(&mut self) {
        self.capturer.pop_trim(self.edge);
    }
}
