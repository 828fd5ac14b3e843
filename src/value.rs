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

//! The opaque argument values carried by a log call.

use std::fmt::Write;

use value_bag::ValueBag;

/// One argument of a log call.
///
/// Arguments are opaque to the pipeline: filters and hooks receive the whole ordered sequence
/// and may inspect each value (`to_borrowed_str`, `to_i64`, ...) or simply display it.
pub type Value<'a> = ValueBag<'a>;

/// Render arguments the way a console does: each value displayed, separated by one space.
pub fn join_args(args: &[Value]) -> String {
    let mut text = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        // SAFETY: write to a string always succeeds
        write!(&mut text, "{arg}").unwrap();
    }
    text
}
