//! Integration tests for Engine logging system
//!
//! These tests verify logger installation, severity filtering and the
//! logging macros through the public API.
//!
//! Run with: cargo test --test logging_integration_tests

use lumen_3d_engine::lumen3d::Engine;
use lumen_3d_engine::lumen3d::log::{format_entry, Logger, LogEntry, LogSeverity};
use lumen_3d_engine::{engine_debug, engine_error, engine_info, engine_trace, engine_warn};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        entries.push(LogEntry {
            severity: entry.severity,
            timestamp: entry.timestamp,
            source: entry.source.clone(),
            message: entry.message.clone(),
            file: entry.file,
            line: entry.line,
        });
    }
}

fn install() -> Arc<Mutex<Vec<LogEntry>>> {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_min_severity(LogSeverity::Trace);
    Engine::set_logger(test_logger);
    entries
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let entries = install();

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Engine::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    let captured_entries = entries.lock().unwrap();
    assert_eq!(captured_entries.len(), 3);

    assert_eq!(captured_entries[0].severity, LogSeverity::Info);
    assert_eq!(captured_entries[0].source, "test::module");
    assert_eq!(captured_entries[0].message, "Test info message");

    assert_eq!(captured_entries[1].severity, LogSeverity::Warn);
    assert_eq!(captured_entries[1].message, "Test warning message");

    assert_eq!(captured_entries[2].severity, LogSeverity::Error);
    assert_eq!(captured_entries[2].message, "Test error message");
    assert_eq!(captured_entries[2].file, None);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let entries = install();

    Engine::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    let captured_entries = entries.lock().unwrap();
    assert_eq!(captured_entries.len(), 1);

    let entry = &captured_entries[0];
    assert_eq!(entry.severity, LogSeverity::Error);
    assert_eq!(entry.source, "test::error");
    assert_eq!(entry.message, "Critical error occurred");
    assert_eq!(entry.file, Some("test_file.rs"));
    assert_eq!(entry.line, Some(42));

    let formatted = format_entry(entry);
    assert!(formatted.contains("Critical error occurred"));
    assert!(formatted.contains("test_file.rs:42"));

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let entries = install();

    Engine::log(LogSeverity::Info, "test", "Message 1".to_string());
    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
    }

    Engine::reset_logger();

    // Goes to the default logger, not captured
    Engine::log(LogSeverity::Info, "test", "Message 2".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
}

#[test]
#[serial]
fn test_integration_logging_different_severities() {
    let entries = install();

    Engine::log(LogSeverity::Trace, "test", "Trace message".to_string());
    Engine::log(LogSeverity::Debug, "test", "Debug message".to_string());
    Engine::log(LogSeverity::Info, "test", "Info message".to_string());
    Engine::log(LogSeverity::Warn, "test", "Warn message".to_string());
    Engine::log(LogSeverity::Error, "test", "Error message".to_string());

    let captured_entries = entries.lock().unwrap();
    assert_eq!(captured_entries.len(), 5);

    assert_eq!(captured_entries[0].severity, LogSeverity::Trace);
    assert_eq!(captured_entries[1].severity, LogSeverity::Debug);
    assert_eq!(captured_entries[2].severity, LogSeverity::Info);
    assert_eq!(captured_entries[3].severity, LogSeverity::Warn);
    assert_eq!(captured_entries[4].severity, LogSeverity::Error);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_min_severity_filters_entries() {
    let entries = install();
    Engine::set_min_severity(LogSeverity::Warn);
    assert_eq!(Engine::min_severity(), LogSeverity::Warn);

    Engine::log(LogSeverity::Debug, "test", "dropped".to_string());
    Engine::log(LogSeverity::Info, "test", "dropped".to_string());
    Engine::log(LogSeverity::Warn, "test", "kept".to_string());
    Engine::log(LogSeverity::Error, "test", "kept".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert!(captured.iter().all(|entry| entry.message == "kept"));
    }

    Engine::set_min_severity(LogSeverity::Trace);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_logging_macros() {
    let entries = install();

    engine_trace!("lumen3d::Test", "visiting {} cells", 3);
    engine_debug!("lumen3d::Test", "stride {}", 32);
    engine_info!("lumen3d::Test", "ready");
    engine_warn!("lumen3d::Test", "unknown key {:?}", "k");
    engine_error!("lumen3d::Test", "upload failed: {}", "out of memory");

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 5);
    assert!(captured.iter().all(|entry| entry.source == "lumen3d::Test"));
    assert_eq!(captured[0].message, "visiting 3 cells");
    assert_eq!(captured[1].message, "stride 32");
    assert_eq!(captured[3].message, "unknown key \"k\"");
    assert_eq!(captured[4].message, "upload failed: out of memory");

    // Only errors carry a location
    assert!(captured[..4].iter().all(|entry| entry.line.is_none()));
    assert!(captured[4].file.is_some_and(|file| file.ends_with("logging_integration_tests.rs")));
    assert!(captured[4].line.is_some());

    Engine::reset_logger();
}
