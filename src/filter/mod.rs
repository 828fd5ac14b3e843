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

//! Filters that can veto a log call before any hook sees it.

use std::fmt;
use std::sync::Arc;
use std::sync::RwLock;

use crate::Severity;
use crate::Value;

pub use self::custom::CustomFilter;

mod custom;

/// A predicate over the arguments of a log call.
pub trait Filter: fmt::Debug + Send + Sync + 'static {
    /// Returns `true` if the call should be suppressed.
    fn suppress(&self, args: &[Value]) -> bool;
}

#[derive(Debug, Clone)]
struct FilterEntry {
    severity: Severity,
    filter: Arc<dyn Filter>,
}

/// The registered filters, in registration order.
///
/// A filter registered at a concrete severity applies to calls at that severity or above; a
/// filter registered at [`Severity::All`] applies to every call.
#[derive(Debug, Default)]
pub struct FilterChain {
    entries: RwLock<Vec<FilterEntry>>,
}

impl FilterChain {
    /// Append a filter under `severity`.
    pub fn add(&self, filter: impl Filter, severity: Severity) {
        let entry = FilterEntry {
            severity,
            filter: Arc::new(filter),
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }

    /// Whether any applicable filter suppresses a call at `severity` with `args`.
    ///
    /// Stops at the first filter that returns `true`.
    pub fn should_suppress(&self, args: &[Value], severity: Severity) -> bool {
        // filters may log themselves; never hold the lock while calling them
        let entries = self.snapshot();
        entries
            .iter()
            .filter(|entry| entry.severity.covers(severity))
            .any(|entry| entry.filter.suppress(args))
    }

    /// The number of registered filters.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<FilterEntry> {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
