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

use jiff::Timestamp;
use jiff::tz::TimeZone;
use serde::Serialize;

use crate::Error;
use crate::Value;
use crate::layout::Layout;
use crate::record::Record;

/// A JSON layout for formatting log records.
///
/// Output format:
///
/// ```json
/// {"timestamp":"2024-08-11T22:44:57.172219+08:00","level":"WARN","message":"disk usage 97","args":["disk usage",97],"trace":["check_disk@main.rs:12:5","main@main.rs:4:5"]}
/// {"timestamp":"2024-08-11T22:44:57.172276+08:00","level":"INFO","message":"listening 8080","args":["listening",8080]}
/// ```
///
/// # Examples
///
/// ```
/// use stacklog::layout::JsonLayout;
///
/// let json_layout = JsonLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
pub struct JsonLayout {
    tz: Option<TimeZone>,
}

impl JsonLayout {
    /// Set the timezone for timestamps. Defaults to the system timezone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    timestamp: String,
    level: &'a str,
    message: String,
    args: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<&'a str>>,
}

fn to_json(value: &Value) -> serde_json::Value {
    if let Some(b) = value.to_bool() {
        return b.into();
    }
    if let Some(n) = value.to_i64() {
        return n.into();
    }
    if let Some(n) = value.to_u64() {
        return n.into();
    }
    if let Some(n) = value.to_f64().and_then(serde_json::Number::from_f64) {
        return n.into();
    }
    value.to_string().into()
}

impl Layout for JsonLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let ts = Timestamp::try_from(record.time())
            .map_err(|err| Error::new("failed to read record time").with_source(err))?;
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let offset = tz.to_offset(ts);

        let record_line = RecordLine {
            timestamp: format!("{:.6}", ts.display_with_offset(offset)),
            level: record.severity().name(),
            message: record.message(),
            args: record.args().iter().map(to_json).collect(),
            trace: record.trace().map(|trace| trace.lines().collect()),
        };

        serde_json::to_vec(&record_line)
            .map_err(|err| Error::new("failed to serialize record").with_source(err))
    }
}
