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


use std::sync::Arc;
use std::sync::Mutex;

use stacklog::Append;
use stacklog::Error;
use stacklog::Record;
use stacklog::Severity;
use stacklog::Verbosity;
use stacklog::filter::CustomFilter;
use stacklog::stack::Browser;
use stacklog::stack::ScriptStack;

#[derive(Debug, Clone, Default)]
struct Recorder(Arc<Mutex<Vec<(Severity, String, Option<String>)>>>);

impl Append for Recorder {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let line = (
            record.severity(),
            record.message(),
            record.trace().map(str::to_string),
        );
        self.0.lock().unwrap().push(line);
        Ok(())
    }
}

// one test per binary: the process-wide logger can only be installed once
#[test]
fn test_macros_drive_the_process_wide_logger() {
    let recorder = Recorder::default();
    let source = ScriptStack::new(Browser::Firefox, || {
        "capture@/srv/app/log.js:1:1\nfacade@/srv/app/log.js:2:1\nmain@/srv/app/main.js:3:1"
            .to_string()
    });
    let installed = stacklog::builder()
        .append(recorder.clone())
        .stack_source(source)
        .try_apply();
    assert!(installed.is_ok());
    assert!(stacklog::builder().try_apply().is_err());

    assert!(stacklog::add_filter(
        CustomFilter::new(|args| args.iter().any(|v| v.to_borrowed_str() == Some("secret"))),
        Severity::All,
    ));

    stacklog::warn_only!("x", 1);
    stacklog::error!("failed", 2.5, true);
    assert!(!stacklog::add_filter(CustomFilter::new(|_| true), "fatal"));
    stacklog::error_only!("secret", "token");
    stacklog::info!("dropped");

    stacklog::set_verbosity(Verbosity::Trace);
    assert!(stacklog::is_enabled(Severity::Trace));
    stacklog::trace_only!();
    stacklog::debug!("traced");
    stacklog::log_info_only(&[stacklog::Value::from("direct")]);

    let frames = stacklog::capture_stack();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].name, "main");

    let lines = recorder.0.lock().unwrap().clone();
    let single = Some("main@/srv/app/main.js:3:1".to_string());
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], (Severity::Warn, "x 1".to_string(), None));
    assert_eq!(lines[1], (Severity::Error, "failed 2.5 true".to_string(), single.clone()));
    assert_eq!(lines[2].0, Severity::Error);
    assert!(lines[2].1.contains("invalid severity"));
    assert_eq!(lines[3], (Severity::Trace, String::new(), None));
    assert_eq!(lines[4], (Severity::Debug, "traced".to_string(), single));
    assert_eq!(lines[5], (Severity::Info, "direct".to_string(), None));
}
