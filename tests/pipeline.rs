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


use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use stacklog::Append;
use stacklog::Error;
use stacklog::Hook;
use stacklog::Logger;
use stacklog::Record;
use stacklog::Severity;
use stacklog::Trap;
use stacklog::Value;
use stacklog::Verbosity;
use stacklog::filter::CustomFilter;
use stacklog::hook::CustomHook;
use stacklog::record::Channel;
use stacklog::stack::Browser;
use stacklog::stack::ScriptStack;

const FIREFOX_STACK: &str = "\
capture@http://localhost/app/js/utility.js:10:5
warn@http://localhost/app/js/utility.js:20:5
check_disk@http://localhost/app/js/main.js:12:5
run@http://localhost/app/js/lib/loop.js:3:1
";

#[derive(Debug, Clone, PartialEq)]
struct Line {
    severity: Severity,
    channel: Channel,
    message: String,
    trace: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Line>>>);

impl Recorder {
    fn lines(&self) -> Vec<Line> {
        self.0.lock().unwrap().clone()
    }
}

impl Append for Recorder {
    fn append(&self, record: &Record) -> Result<(), Error> {
        self.0.lock().unwrap().push(Line {
            severity: record.severity(),
            channel: record.channel(),
            message: record.message(),
            trace: record.trace().map(str::to_string),
        });
        Ok(())
    }
}

type HookCalls = Arc<Mutex<Vec<(Severity, bool, String)>>>;

fn recording_hook(calls: &HookCalls) -> CustomHook {
    let calls = calls.clone();
    CustomHook::new(move |severity, wants_trace, args| {
        calls
            .lock()
            .unwrap()
            .push((severity, wants_trace, stacklog::join_args(args)));
    })
}

struct Fixture {
    logger: Logger,
    lines: Recorder,
    captures: Arc<AtomicUsize>,
}

fn fixture(browser: Browser, stack: &'static str, verbosity: Verbosity) -> Fixture {
    let lines = Recorder::default();
    let captures = Arc::new(AtomicUsize::new(0));
    let counter = captures.clone();
    let source = ScriptStack::new(browser, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        stack.to_string()
    });
    let logger = stacklog::builder()
        .append(lines.clone())
        .stack_source(source)
        .verbosity(verbosity)
        .build();
    Fixture {
        logger,
        lines,
        captures,
    }
}

fn firefox(verbosity: Verbosity) -> Fixture {
    fixture(Browser::Firefox, FIREFOX_STACK, verbosity)
}

#[test]
fn test_plain_call_reaches_hook_without_stack_work() {
    let f = firefox(Verbosity::Default);
    let calls = HookCalls::default();
    assert!(f.logger.add_hook(recording_hook(&calls), Severity::All));

    f.logger.warn_only(&[Value::from("x"), Value::from(1)]);

    assert_eq!(*calls.lock().unwrap(), [(Severity::Warn, false, "x 1".to_string())]);
    assert_eq!(f.captures.load(Ordering::SeqCst), 0);
    assert_eq!(
        f.lines.lines(),
        [Line {
            severity: Severity::Warn,
            channel: Channel::Warn,
            message: "x 1".to_string(),
            trace: None,
        }]
    );
}

#[test]
fn test_traced_call_hides_facade_and_compacts_paths() {
    let f = firefox(Verbosity::Default);
    let calls = HookCalls::default();
    f.logger.add_hook(recording_hook(&calls), "WARN");

    f.logger.error(&[Value::from("cannot open"), Value::from("settings.toml")]);
    f.logger.warn(&[Value::from("disk almost full")]);

    assert_eq!(*calls.lock().unwrap(), [(Severity::Warn, true, "disk almost full".to_string())]);
    assert_eq!(f.captures.load(Ordering::SeqCst), 2);

    let lines = f.lines.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].channel, Channel::Error);
    assert_eq!(lines[0].message, "cannot open settings.toml");
    assert_eq!(lines[1].channel, Channel::Warn);
    for line in &lines {
        assert_eq!(
            line.trace.as_deref(),
            Some("check_disk@main.js:12:5\nrun@lib/loop.js:3:1")
        );
    }
    assert_eq!(f.logger.trim_begin(), 0);
}

#[test]
fn test_chrome_stack_is_parsed_with_v8_format() {
    let stack = "Error
    at Object.warn [as Warn] (http://localhost/app/js/utility.js:20:5)
    at check_disk (http://localhost/app/js/main.js:12:5)
    at run (http://localhost/app/js/main.js:30:9)";
    let f = fixture(Browser::Chrome, stack, Verbosity::Default);

    f.logger.warn(&[Value::from("hello")]);

    // the header line stands where Firefox has the capture frame
    let lines = f.lines.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0].trace.as_deref(),
        Some("check_disk@main.js:12:5\nrun@main.js:30:9")
    );
}

#[test]
fn test_verbosity_gates_before_hooks() {
    let f = firefox(Verbosity::Default);
    let calls = HookCalls::default();
    f.logger.add_hook(recording_hook(&calls), Severity::All);

    f.logger.info_only(&[Value::from("dropped")]);
    f.logger.debug(&[Value::from("dropped")]);
    assert!(calls.lock().unwrap().is_empty());
    assert!(f.lines.lines().is_empty());

    f.logger.set_verbosity(Verbosity::Off);
    f.logger.info_only(&[Value::from("kept")]);
    f.logger.debug_only(&[Value::from("dropped")]);

    f.logger.set_verbosity(Verbosity::Debug);
    f.logger.debug_only(&[Value::from("kept")]);
    f.logger.trace_only(&[Value::from("dropped")]);

    f.logger.set_verbosity(Verbosity::Trace);
    f.logger.trace_only(&[Value::from("kept")]);

    let lines = f.lines.lines();
    let severities = lines.iter().map(|l| l.severity).collect::<Vec<_>>();
    assert_eq!(severities, [Severity::Info, Severity::Debug, Severity::Trace]);
    assert!(lines.iter().all(|l| l.message == "kept" && l.channel == Channel::Log));
    assert_eq!(calls.lock().unwrap().len(), 3);
    assert_eq!(f.captures.load(Ordering::SeqCst), 0);
}

#[test]
fn test_filters_cover_their_severity_and_above() {
    let f = firefox(Verbosity::Trace);
    let calls = HookCalls::default();
    f.logger.add_hook(recording_hook(&calls), Severity::All);
    f.logger.add_filter(
        CustomFilter::new(|args| args.first().and_then(|v| v.to_borrowed_str()) == Some("noise")),
        "warn",
    );

    f.logger.info_only(&[Value::from("noise")]);
    f.logger.warn_only(&[Value::from("noise")]);
    f.logger.error(&[Value::from("noise"), Value::from(2)]);
    f.logger.error_only(&[Value::from("signal")]);

    let messages = f.lines.lines().into_iter().map(|l| l.message).collect::<Vec<_>>();
    assert_eq!(messages, ["noise", "signal"]);
    assert_eq!(calls.lock().unwrap().len(), 2);
    assert_eq!(f.captures.load(Ordering::SeqCst), 0);

    // a filter under ALL applies to every call
    f.logger
        .add_filter(CustomFilter::new(|args| args.len() > 1), Severity::All);
    f.logger.trace_only(&[Value::from("a"), Value::from("b")]);
    assert_eq!(f.lines.lines().len(), 2);
    assert!(f.logger.should_suppress(&[Value::from(1), Value::from(2)], Severity::Trace));
    assert!(!f.logger.should_suppress(&[Value::from(1)], Severity::Trace));
}

#[test]
fn test_hooks_fire_for_their_severity_in_order() {
    let f = firefox(Verbosity::Trace);
    let order = Arc::new(Mutex::new(vec![]));
    for (name, severity) in [("all", "ALL"), ("warn", "WARN"), ("error", "ERROR")] {
        let order = order.clone();
        let hook = CustomHook::new(move |_, _, _| order.lock().unwrap().push(name));
        assert!(f.logger.add_hook(hook, severity));
    }

    f.logger.warn_only(&[Value::from("w")]);
    f.logger.info_only(&[Value::from("i")]);
    assert_eq!(*order.lock().unwrap(), ["all", "warn", "all"]);
}

#[test]
fn test_invalid_severity_is_reported_and_rejected() {
    let f = firefox(Verbosity::Default);
    let calls = HookCalls::default();

    assert!(!f.logger.add_hook(recording_hook(&calls), "LOUD"));
    assert!(!f.logger.add_filter(CustomFilter::new(|_| true), "quiet"));
    assert!(!f.logger.is_enabled("ALL"));
    assert!(f.logger.is_enabled("error"));
    assert!(!f.logger.is_enabled(Severity::Info));

    let lines = f.lines.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.channel == Channel::Error && l.trace.is_none()));
    assert!(lines[0].message.contains("invalid severity"));
    assert!(lines[0].message.contains("LOUD"));
    assert!(lines[2].message.contains("ALL"));

    // the rejected registrations have no effect
    f.logger.error_only(&[Value::from("still logged")]);
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(f.lines.lines().len(), 4);

    // ALL is not a level to log at
    f.logger.log(Severity::All, &[Value::from("nope")], false);
    let lines = f.lines.lines();
    assert_eq!(lines.len(), 5);
    assert!(lines[4].message.contains("invalid severity"));
}

#[test]
fn test_unparseable_line_is_reported_once_without_trace() {
    let stack = "\
capture@http://localhost/app/js/utility.js:10:5
warn@http://localhost/app/js/utility.js:20:5
check_disk@http://localhost/app/js/main.js:12:5
[native code]
run@http://localhost/app/js/lib/loop.js:3:1
";
    let f = fixture(Browser::Firefox, stack, Verbosity::Default);

    f.logger.warn(&[Value::from("hello")]);

    let lines = f.lines.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].severity, Severity::Error);
    assert_eq!(lines[0].message, "failed to parse stack frame [native code]");
    assert_eq!(lines[0].trace, None);
    assert_eq!(
        lines[1].trace.as_deref(),
        Some("check_disk@main.js:12:5\nrun@lib/loop.js:3:1")
    );
    assert_eq!(f.captures.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unknown_host_yields_no_frames() {
    let f = fixture(Browser::Obs, FIREFOX_STACK, Verbosity::Default);

    f.logger.warn(&[Value::from("hello")]);

    let lines = f.lines.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].trace.as_deref(), Some(""));
    assert!(f.logger.capture_stack().is_empty());
}

#[test]
fn test_trim_levels_shape_the_trace() {
    let f = firefox(Verbosity::Default);

    f.logger.push_trim_begin(2);
    f.logger.warn(&[Value::from("a")]);
    f.logger.pop_trim_begin();
    f.logger.pop_trim_begin();
    assert_eq!(f.logger.trim_begin(), 0);

    f.logger.push_trim_end(1);
    f.logger.warn(&[Value::from("b")]);
    f.logger.pop_trim_end();
    assert_eq!(f.logger.trim_end(), 0);

    {
        let _hidden = f.logger.hide_frames_end(10);
        f.logger.warn(&[Value::from("c")]);
    }
    assert_eq!(f.logger.trim_end(), 0);

    let traces = f
        .lines
        .lines()
        .into_iter()
        .map(|l| l.trace.unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(
        traces,
        [
            "run@http://localhost/app/js/lib/loop.js:3:1",
            "check_disk@http://localhost/app/js/main.js:12:5",
            "",
        ]
    );
}

#[test]
fn test_trim_guard_is_released_on_panic() {
    let f = firefox(Verbosity::Default);

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        let _hidden = f.logger.hide_frames_begin(3);
        assert_eq!(f.logger.trim_begin(), 3);
        panic!("boom");
    }));

    assert!(result.is_err());
    assert_eq!(f.logger.trim_begin(), 0);
}

#[test]
fn test_capture_stack_hides_its_own_frame() {
    let f = firefox(Verbosity::Default);

    let frames = f.logger.capture_stack();
    let names = frames.iter().map(|f| f.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["check_disk", "run"]);
    assert_eq!(frames[0].file, "http://localhost/app/js/main.js");
    assert_eq!((frames[0].line, frames[0].column), (12, 5));
    assert_eq!(f.logger.trim_begin(), 0);
}

#[derive(Debug)]
struct FailingHook;

impl Hook for FailingHook {
    fn call(&self, _: Severity, _: bool, _: &[Value]) -> Result<(), Error> {
        Err(Error::new("hook refused"))
    }
}

#[test]
fn test_failing_hook_does_not_stop_dispatch() {
    let f = firefox(Verbosity::Default);
    let calls = HookCalls::default();
    f.logger.add_hook(FailingHook, Severity::All);
    f.logger.add_hook(recording_hook(&calls), Severity::All);

    f.logger.warn_only(&[Value::from("x")]);

    assert_eq!(calls.lock().unwrap().len(), 1);
    let lines = f.lines.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].channel, Channel::Error);
    assert!(lines[0].message.contains("hook refused"));
    assert_eq!(lines[1].message, "x");
}

#[test]
fn test_hook_may_log_reentrantly() {
    let f = firefox(Verbosity::Trace);
    let logger = Arc::new(f.logger);
    let inner = Arc::downgrade(&logger);
    logger.add_hook(
        CustomHook::new(move |_, _, _| {
            if let Some(logger) = inner.upgrade() {
                logger.info_only(&[Value::from("nested")]);
                logger.add_filter(CustomFilter::new(|_| false), Severity::All);
            }
        }),
        Severity::Warn,
    );

    logger.warn(&[Value::from("outer")]);

    let lines = f.lines.lines();
    let messages = lines.iter().map(|l| l.message.as_str()).collect::<Vec<_>>();
    assert_eq!(messages, ["nested", "outer"]);
    assert!(lines[1].trace.is_some());
    assert_eq!(logger.trim_begin(), 0);
}

#[derive(Debug)]
struct BrokenSink;

impl Append for BrokenSink {
    fn append(&self, _: &Record) -> Result<(), Error> {
        Err(Error::new("sink is closed"))
    }
}

#[derive(Debug, Clone, Default)]
struct TrapRecorder(Arc<Mutex<Vec<String>>>);

impl Trap for TrapRecorder {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.to_string());
    }
}

#[test]
fn test_sink_failure_goes_to_trap() {
    let lines = Recorder::default();
    let trapped = TrapRecorder::default();
    let logger = stacklog::builder()
        .append(BrokenSink)
        .append(lines.clone())
        .trap(trapped.clone())
        .build();

    logger.error_only(&[Value::from("x")]);

    assert_eq!(lines.lines().len(), 1);
    let trapped = trapped.0.lock().unwrap();
    assert_eq!(trapped.len(), 1);
    assert!(trapped[0].contains("sink is closed"));
    assert!(trapped[0].contains("ERROR"));
}

fn report_from_here(logger: &Logger) {
    logger.warn(&[Value::from("native")]);
}

#[test]
fn test_native_stack_traces_parse_cleanly() {
    let lines = Recorder::default();
    let logger = stacklog::builder().append(lines.clone()).build();

    report_from_here(&logger);

    let lines = lines.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].severity, Severity::Warn);
    let trace = lines[0].trace.as_deref().unwrap_or_default();
    assert!(!trace.contains("stacklog::logger"), "{trace}");
}

#[inline(never)]
fn warn_unwrapped(logger: &Logger) {
    logger.warn(&[Value::from("plain")]);
}

#[inline(never)]
fn warn_through_helper(logger: &Logger) {
    let _hidden = logger.hide_frames_begin(logger.trim_begin().max(1) + 1);
    logger.warn(&[Value::from("wrapped")]);
}

#[test]
fn test_wrapper_hides_its_own_native_frame() {
    let lines = Recorder::default();
    let logger = stacklog::builder().append(lines.clone()).build();

    warn_unwrapped(&logger);
    warn_through_helper(&logger);
    assert_eq!(logger.trim_begin(), 0);

    let traces = lines
        .lines()
        .into_iter()
        .map(|l| l.trace.unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(traces.len(), 2);
    assert!(traces[0].starts_with("pipeline::warn_unwrapped@"), "{}", traces[0]);
    assert!(!traces[1].contains("warn_through_helper"), "{}", traces[1]);
    assert!(!traces[1].contains("stacklog::"), "{}", traces[1]);
}

#[test]
fn test_panicking_hook_reaches_the_caller() {
    let f = firefox(Verbosity::Default);
    let calls = HookCalls::default();
    f.logger.add_hook(
        CustomHook::new(|_, _, _| panic!("hook exploded")),
        Severity::All,
    );
    f.logger.add_hook(recording_hook(&calls), Severity::All);

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        f.logger.error(&[Value::from("x")]);
    }));

    assert!(result.is_err());
    assert!(calls.lock().unwrap().is_empty());
    assert!(f.lines.lines().is_empty());
    assert_eq!(f.captures.load(Ordering::SeqCst), 0);
    assert_eq!((f.logger.trim_begin(), f.logger.trim_end()), (0, 0));
}

#[test]
fn test_panicking_filter_reaches_the_caller() {
    let f = firefox(Verbosity::Default);
    let calls = HookCalls::default();
    f.logger.add_filter(
        CustomFilter::new(|_| panic!("filter exploded")),
        Severity::All,
    );
    f.logger.add_hook(recording_hook(&calls), Severity::All);

    f.logger.push_trim_end(1);
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        f.logger.warn(&[Value::from("x")]);
    }));

    assert!(result.is_err());
    assert!(calls.lock().unwrap().is_empty());
    assert!(f.lines.lines().is_empty());
    assert_eq!((f.logger.trim_begin(), f.logger.trim_end()), (0, 1));
    f.logger.pop_trim_end();
    assert_eq!(f.logger.trim_end(), 0);
}

#[test]
fn test_panicking_stack_source_restores_trim() {
    let source = ScriptStack::new(Browser::Firefox, || panic!("no stack"));
    let logger = stacklog::builder()
        .append(Recorder::default())
        .stack_source(source)
        .build();
    logger.push_trim_begin(2);

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        logger.warn(&[Value::from("x")]);
    }));

    assert!(result.is_err());
    assert_eq!(logger.trim_begin(), 2);
    logger.pop_trim_begin();
    assert_eq!(logger.trim_begin(), 0);
}
