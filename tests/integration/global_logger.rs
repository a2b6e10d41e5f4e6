//! The process-wide logger.
//!
//! Everything touching global state lives in one test so parallel tests never
//! race on it. Other tests may still log through the global logger while this
//! runs, so assertions look lines up by message.

use std::sync::atomic::{AtomicBool, Ordering};

use ctxlog::config::LoggingConfig;
use ctxlog::logging::{Logger, MemoryWriter};
use ctxlog::{errorf, infof, traceln, Context, Severity};
use serde_json::Value;

/// Whether any output line mentions `text`, in either output format.
fn mentions(sink: &MemoryWriter, text: &str) -> bool {
    sink.lines().iter().any(|line| line.contains(text))
}

fn find(sink: &MemoryWriter, message: &str) -> Option<Value> {
    sink.json_lines()
        .into_iter()
        .find(|line| line["message"] == message)
}

#[test]
fn test_global_logger_lifecycle() {
    // Reconfiguring the level rebuilds the logger; output below the level
    // never reaches the sink.
    let errors_only = MemoryWriter::new();
    ctxlog::set_level_with_writer(Severity::Error, errors_only.clone());
    assert_eq!(ctxlog::logging::level(), Severity::Error);
    assert!(!ctxlog::logger().enabled(Severity::Info));
    assert!(ctxlog::logger().enabled(Severity::Fatal));

    ctxlog::tracef!("filtered trace {}", 1);
    ctxlog::debugf!("filtered debug {}", 2);
    infof!("filtered info {}", 3);
    errorf!("kept error {}", 4);
    ctxlog::fatal().msg("kept fatal 5");

    assert!(!mentions(&errors_only, "filtered trace 1"));
    assert!(!mentions(&errors_only, "filtered debug 2"));
    assert!(!mentions(&errors_only, "filtered info 3"));
    assert!(mentions(&errors_only, "kept error 4"));
    assert!(mentions(&errors_only, "kept fatal 5"));
    // The announcement is a TRACE event of the new logger.
    assert!(!mentions(&errors_only, "Set global log value to"));

    let ran = AtomicBool::new(false);
    ctxlog::trace_fn(|| ran.store(true, Ordering::SeqCst));
    assert!(!ran.load(Ordering::SeqCst));

    // A logger fetched before a swap keeps its settings.
    let before = ctxlog::logger();

    let sink = MemoryWriter::new();
    ctxlog::set_logger(Logger::with_writer(
        LoggingConfig {
            level: Severity::Trace,
            json: true,
        },
        sink.clone(),
    ));
    assert_eq!(before.level(), Severity::Error);
    assert_eq!(ctxlog::logging::level(), Severity::Trace);

    ctxlog::trace_fn(|| ran.store(true, Ordering::SeqCst));
    assert!(ran.load(Ordering::SeqCst));

    infof!("This is an info message: {}", 3);
    errorf!("This is an error message: {}", 4);
    traceln!("Traceln:", "multiple", "args", 123);
    ctxlog::info()
        .str("key", "value")
        .int("count", 42)
        .msg("Structured logging example");
    ctxlog::with()
        .str("svc", "billing")
        .logger()
        .debug()
        .msg("child logger");
    Context::background().logger().error().msg("context fallback");
    ctxlog::fatal().msg("still alive");

    let info = find(&sink, "This is an info message: 3").expect("infof line");
    assert_eq!(info["level"], "info");
    assert_eq!(
        find(&sink, "This is an error message: 4").expect("errorf line")["level"],
        "error"
    );
    assert_eq!(
        find(&sink, "Traceln: multiple args 123\n").expect("traceln line")["level"],
        "trace"
    );

    let structured = find(&sink, "Structured logging example").expect("structured line");
    assert_eq!(structured["key"], "value");
    assert_eq!(structured["count"], 42);
    assert!(structured["time"].is_string());

    assert_eq!(find(&sink, "child logger").expect("child line")["svc"], "billing");
    assert!(find(&sink, "context fallback").is_some());
    assert_eq!(find(&sink, "still alive").expect("fatal line")["level"], "fatal");

    // At TRACE the announcement shows up in the new logger's sink only.
    let everything = MemoryWriter::new();
    ctxlog::set_level_with_writer(Severity::Trace, everything.clone());
    assert_eq!(ctxlog::logging::level(), Severity::Trace);
    assert!(mentions(&everything, "Set global log value to trace"));
    assert!(!mentions(&sink, "Set global log value to trace"));

    ctxlog::tracef!("visible trace {}", 6);
    assert!(mentions(&everything, "visible trace 6"));
    assert!(!mentions(&errors_only, "visible trace 6"));

    ctxlog::set_level(Severity::Info);
    assert_eq!(ctxlog::logging::level(), Severity::Info);
}
