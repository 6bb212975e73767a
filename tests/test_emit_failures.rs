mod test_utils;

use alog::writers::{BufferWriter, LogWriter};
use alog::{AlogError, Level, LogFormatter, LogRecord, LogRegistry, PrettyFormatter};
use std::io;
use std::sync::Arc;
use test_utils::{buffer_lines, registry_with_buffer};

struct FailingFormatter;
impl LogFormatter for FailingFormatter {
    fn format(&self, _record: &LogRecord) -> Result<Vec<String>, AlogError> {
        Err(AlogError::Format("deliberately broken".to_string()))
    }
}

struct BrokenPipeSink;
impl LogWriter for BrokenPipeSink {
    fn write(&self, _lines: &[String]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "receiver gone"))
    }
    fn flush(&self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "receiver gone"))
    }
}

#[test]
fn formatter_failure_is_contained() {
    let (registry, buffer) = registry_with_buffer();
    registry.configure(Level::Debug, "").unwrap();
    registry.set_formatter(FailingFormatter);

    // the call succeeds even though nothing could be rendered
    registry.log("MAIN", Level::Info, "lost").unwrap();
    assert!(buffer_lines(&buffer).is_empty());

    // the registry keeps working once a usable formatter is back
    registry.set_formatter(PrettyFormatter::new());
    registry.log("MAIN", Level::Info, "back again").unwrap();
    let lines = buffer_lines(&buffer);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("back again"));
}

#[test]
fn sink_failure_does_not_starve_other_sinks() {
    let registry = LogRegistry::new();
    let buffer = BufferWriter::new(100_000);
    // the broken sink comes first in the fan-out order
    registry.set_sink(Arc::new(BrokenPipeSink));
    registry.add_sink(Arc::new(buffer.clone()));
    registry.configure(Level::Debug, "").unwrap();

    registry.log("MAIN", Level::Info, "still delivered").unwrap();
    registry.flush();

    let lines = buffer_lines(&buffer);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("still delivered"));
}

#[test]
fn scope_drop_survives_a_failing_formatter() {
    let (registry, buffer) = registry_with_buffer();
    registry.configure(Level::Debug, "").unwrap();
    let ch = registry.channel("MAIN");

    {
        let _scope = ch.log_scope(Level::Debug, "fragile");
        registry.set_formatter(FailingFormatter);
    } // the End: emission fails inside Drop and must not panic

    registry.set_formatter(PrettyFormatter::new());
    ch.debug("alive");

    let lines = buffer_lines(&buffer);
    // Start: was rendered before the formatter broke, End: was swallowed
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Start: fragile"));
    assert!(lines[1].contains("alive"));
}
