use alog::writers::{BufferWriter, Snapshot};
use alog::LogRegistry;
use std::sync::Arc;

// An independent registry writing only to an in-memory buffer, so tests can
// assert on exact output without touching the process-wide instance.
pub fn registry_with_buffer() -> (LogRegistry, BufferWriter) {
    let registry = LogRegistry::new();
    let buffer = BufferWriter::new(1_000_000);
    registry.set_sink(Arc::new(buffer.clone()));
    (registry, buffer)
}

pub fn buffer_lines(buffer: &BufferWriter) -> Vec<String> {
    let mut snapshot = Snapshot::new();
    buffer.update_snapshot(&mut snapshot);
    snapshot.text.lines().map(str::to_string).collect()
}
