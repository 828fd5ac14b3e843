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

//! Hooks: sink callbacks that observe every record that passes the gate and the filters.

use std::fmt;
use std::sync::Arc;
use std::sync::RwLock;

use crate::Error;
use crate::Severity;
use crate::Value;

pub use self::custom::CustomHook;

mod custom;

/// A callback invoked with the severity, whether a trace was requested, and the arguments of
/// each dispatched call.
pub trait Hook: fmt::Debug + Send + Sync + 'static {
    /// Observe one call.
    ///
    /// An error does not stop the remaining hooks; it is reported on the sinks' error channel.
    fn call(&self, severity: Severity, wants_trace: bool, args: &[Value]) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
struct HookEntry {
    severity: Severity,
    hook: Arc<dyn Hook>,
}

/// The registered hooks, in registration order.
///
/// A call at severity `S` fires every hook registered at exactly `S` and every hook registered
/// at [`Severity::All`], interleaved in the order they were added.
#[derive(Debug, Default)]
pub struct HookDispatcher {
    entries: RwLock<Vec<HookEntry>>,
}

impl HookDispatcher {
    /// Append a hook under `severity`.
    pub fn add(&self, hook: impl Hook, severity: Severity) {
        let entry = HookEntry {
            severity,
            hook: Arc::new(hook),
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }

    /// Invoke the hooks for a call at `severity`; returns the errors of the hooks that failed.
    pub fn dispatch(&self, severity: Severity, wants_trace: bool, args: &[Value]) -> Vec<Error> {
        // hooks may log or register more hooks; never hold the lock while calling them
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner()).clone();

        let mut errors = vec![];
        for entry in entries {
            if entry.severity != severity && entry.severity != Severity::All {
                continue;
            }
            if let Err(err) = entry.hook.call(severity, wants_trace, args) {
                errors.push(err.with_context("hook_severity", entry.severity));
            }
        }
        errors
    }

    /// The number of registered hooks.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no hook is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
