use crate::util::lock;
use crate::writers::LogWriter;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Sink that keeps the most recent log lines in memory, up to a size limit.
///
/// Cloning is cheap and shares the buffer, so a clone kept by the
/// application (or a test) can read what the registry wrote via
/// [`BufferWriter::update_snapshot`].
#[derive(Clone)]
pub struct BufferWriter {
    state: Arc<Mutex<State>>,
}

struct State {
    buffer: VecDeque<String>,
    size: usize,
    max_size: usize,
    last_update: Instant,
}

impl BufferWriter {
    /// Creates a buffer that holds at most `max_size` bytes of lines; the
    /// oldest lines are evicted first.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                buffer: VecDeque::new(),
                size: 0,
                max_size,
                last_update: Instant::now(),
            })),
        }
    }

    /// Updates a snapshot with the current buffer content.
    ///
    /// Does nothing if the snapshot is up-to-date. Returns whether the
    /// snapshot was updated.
    pub fn update_snapshot(&self, snapshot: &mut Snapshot) -> bool {
        let state = lock(&self.state);
        if snapshot.last_update == Some(state.last_update) {
            false
        } else {
            snapshot.text.clear();
            for line in &state.buffer {
                snapshot.text.push_str(line);
                snapshot.text.push('\n');
            }
            snapshot.last_update = Some(state.last_update);
            true
        }
    }
}

impl LogWriter for BufferWriter {
    fn write(&self, lines: &[String]) -> io::Result<()> {
        let mut state = lock(&self.state);
        for line in lines {
            if line.len() > state.max_size {
                state.buffer.clear();
                state.size = 0;
            } else {
                while state.size + line.len() > state.max_size {
                    if let Some(evicted) = state.buffer.pop_front() {
                        state.size -= evicted.len();
                    }
                }
            }
            state.size += line.len();
            state.buffer.push_back(line.clone());
        }
        if !lines.is_empty() {
            state.last_update = Instant::now();
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        // nothing to do
        Ok(())
    }
}

/// Allows reading the current content of a [`BufferWriter`].
#[derive(Clone, Default)]
pub struct Snapshot {
    /// The buffered lines, newline-terminated, at the last update.
    pub text: String,
    last_update: Option<Instant>,
}

impl Snapshot {
    /// An empty snapshot; the first update always fills it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{BufferWriter, Snapshot};
    use crate::writers::LogWriter;

    #[test]
    fn evicts_oldest_lines_beyond_the_limit() {
        let writer = BufferWriter::new(10);
        writer.write(&["aaaa".to_string()]).unwrap();
        writer.write(&["bbbb".to_string()]).unwrap();
        writer.write(&["cccc".to_string()]).unwrap();

        let mut snapshot = Snapshot::new();
        assert!(writer.update_snapshot(&mut snapshot));
        assert_eq!(snapshot.text, "bbbb\ncccc\n");
    }

    #[test]
    fn snapshot_update_is_idempotent() {
        let writer = BufferWriter::new(100);
        writer.write(&["line".to_string()]).unwrap();

        let mut snapshot = Snapshot::new();
        assert!(writer.update_snapshot(&mut snapshot));
        assert!(!writer.update_snapshot(&mut snapshot));
        assert_eq!(snapshot.text, "line\n");
    }

    #[test]
    fn oversized_line_evicts_everything_else() {
        let writer = BufferWriter::new(8);
        writer.write(&["abcd".to_string()]).unwrap();
        writer.write(&["way too long for the cap".to_string()]).unwrap();

        let mut snapshot = Snapshot::new();
        writer.update_snapshot(&mut snapshot);
        assert_eq!(snapshot.text, "way too long for the cap\n");

        // the next regular write evicts the oversized line again
        writer.write(&["ok".to_string()]).unwrap();
        writer.update_snapshot(&mut snapshot);
        assert_eq!(snapshot.text, "ok\n");
    }
}
