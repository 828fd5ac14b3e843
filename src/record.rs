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

//! Log record handed to the sinks.

use std::time::SystemTime;

use crate::Severity;
use crate::Value;
use crate::value::join_args;

/// The output channel of a diagnostic sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// The ordinary output channel, used by `Trace`, `Debug` and `Info`.
    Log,
    /// The warning channel.
    Warn,
    /// The error channel.
    Error,
}

impl Channel {
    /// The channel a record of `severity` is written to.
    pub fn of(severity: Severity) -> Channel {
        match severity {
            Severity::Warn => Channel::Warn,
            Severity::Error | Severity::All => Channel::Error,
            Severity::Trace | Severity::Debug | Severity::Info => Channel::Log,
        }
    }
}

/// A normalized record: what survived the gate and the filters.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    now: SystemTime,

    severity: Severity,
    args: &'a [Value<'a>],

    // the formatted stack, for traced calls
    trace: Option<&'a str>,
}

impl<'a> Record<'a> {
    /// Create a record without a stack trace.
    pub fn new(severity: Severity, args: &'a [Value<'a>]) -> Self {
        Self {
            now: SystemTime::now(),
            severity,
            args,
            trace: None,
        }
    }

    /// Attach a formatted stack trace.
    pub fn with_trace(mut self, trace: &'a str) -> Self {
        self.trace = Some(trace);
        self
    }

    /// The observed time.
    pub fn time(&self) -> SystemTime {
        self.now
    }

    /// The severity of the record.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The sink channel this record belongs to.
    pub fn channel(&self) -> Channel {
        Channel::of(self.severity)
    }

    /// The arguments of the log call, in order.
    pub fn args(&self) -> &'a [Value<'a>] {
        self.args
    }

    /// The arguments rendered as one message.
    pub fn message(&self) -> String {
        join_args(self.args)
    }

    /// The formatted stack trace, one frame per line, if the call asked for one.
    pub fn trace(&self) -> Option<&'a str> {
        self.trace
    }
}
