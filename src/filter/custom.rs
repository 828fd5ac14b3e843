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

use crate::Value;
use crate::filter::Filter;

/// A filter that you can pass the custom predicate.
///
/// The predicate receives all arguments of the call and returns `true` to suppress it. For
/// example:
///
/// ```rust
/// use stacklog::Value;
/// use stacklog::filter::CustomFilter;
///
/// let filter = CustomFilter::new(|args: &[Value]| {
///     args.iter()
///         .any(|arg| arg.to_borrowed_str() == Some("heartbeat"))
/// });
/// ```
pub struct CustomFilter {
    f: Box<dyn Fn(&[Value]) -> bool + Send + Sync + 'static>,
}

impl fmt::Debug for CustomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomFilter {{ ... }}")
    }
}

impl CustomFilter {
    /// Create a filter from a predicate.
    pub fn new(filter: impl Fn(&[Value]) -> bool + Send + Sync + 'static) -> Self {
        CustomFilter {
            f: Box::new(filter),
        }
    }
}

impl Filter for CustomFilter {
    fn suppress(&self, args: &[Value]) -> bool {
        (self.f)(args)
    }
}
