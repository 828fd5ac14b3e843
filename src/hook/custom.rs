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

use crate::Error;
use crate::Severity;
use crate::Value;
use crate::hook::Hook;

/// A hook that you can pass the custom callback.
///
/// ```rust
/// use stacklog::Severity;
/// use stacklog::Value;
/// use stacklog::hook::CustomHook;
///
/// let hook = CustomHook::new(|severity: Severity, wants_trace: bool, args: &[Value]| {
///     if severity >= Severity::Error {
///         eprintln!("alert ({} args, trace: {wants_trace})", args.len());
///     }
/// });
/// ```
pub struct CustomHook {
    f: Box<dyn Fn(Severity, bool, &[Value]) + Send + Sync + 'static>,
}

impl fmt::Debug for CustomHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomHook {{ ... }}")
    }
}

impl CustomHook {
    /// Create a hook from a callback.
    pub fn new(hook: impl Fn(Severity, bool, &[Value]) + Send + Sync + 'static) -> Self {
        CustomHook { f: Box::new(hook) }
    }
}

impl Hook for CustomHook {
    fn call(&self, severity: Severity, wants_trace: bool, args: &[Value]) -> Result<(), Error> {
        (self.f)(severity, wants_trace, args);
        Ok(())
    }
}
