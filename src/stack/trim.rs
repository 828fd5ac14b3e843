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

/// Which end of a captured stack a trim level applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimEdge {
    /// Lines removed from the top (innermost frames).
    Begin,
    /// Lines removed from the bottom (outermost frames).
    End,
}

/// A stack of trim levels whose first element is a permanent base.
///
/// Nested callers push a level to hide their own frames and pop it when done; the base can
/// never be popped, so [`current`](TrimStack::current) always has an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimStack {
    levels: Vec<usize>,
}

impl Default for TrimStack {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TrimStack {
    /// Create a stack holding only `base`.
    pub fn new(base: usize) -> Self {
        Self { levels: vec![base] }
    }

    /// Make `level` the current level.
    pub fn push(&mut self, level: usize) {
        self.levels.push(level);
    }

    /// Restore the previous level. A no-op when only the base is left.
    pub fn pop(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    /// The current level.
    pub fn current(&self) -> usize {
        // the base is never removed
        self.levels.last().copied().unwrap_or_default()
    }

    /// The number of levels, base included. Never less than one.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }
}
