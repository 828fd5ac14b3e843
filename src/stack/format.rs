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

use crate::stack::StackFrame;
use crate::stack::compact_paths;

/// Render frames as `name@file:line:column`, one per line, with the files compacted across the
/// whole stack.
pub fn format_stack(frames: &[StackFrame]) -> String {
    let files = frames.iter().map(|f| f.file.as_str()).collect::<Vec<_>>();
    let paths = compact_paths(&files);
    assert_eq!(
        frames.len(),
        paths.len(),
        "path compaction must preserve the number of frames"
    );

    frames
        .iter()
        .zip(paths)
        .map(|(frame, path)| format!("{}@{path}:{}:{}", frame.name, frame.line, frame.column))
        .collect::<Vec<_>>()
        .join("\n")
}
