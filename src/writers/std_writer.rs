use crate::util::write_lines;
use crate::writers::LogWriter;
use std::io::{self, Stderr, Stdout};

// The standard streams carry their own locks, which gives the per-record
// atomicity the LogWriter contract asks for.
enum StdStream {
    Out(Stdout),
    Err(Stderr),
}

/// Sink that writes to stdout or stderr.
///
/// A stderr instance is the registry's default sink.
pub struct StdWriter {
    stream: StdStream,
}

impl StdWriter {
    /// A sink on stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            stream: StdStream::Out(io::stdout()),
        }
    }

    /// A sink on stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            stream: StdStream::Err(io::stderr()),
        }
    }
}

impl LogWriter for StdWriter {
    fn write(&self, lines: &[String]) -> io::Result<()> {
        match &self.stream {
            StdStream::Out(stream) => write_lines(&mut stream.lock(), lines),
            StdStream::Err(stream) => write_lines(&mut stream.lock(), lines),
        }
    }

    fn flush(&self) -> io::Result<()> {
        use std::io::Write;
        match &self.stream {
            StdStream::Out(stream) => stream.lock().flush(),
            StdStream::Err(stream) => stream.lock().flush(),
        }
    }
}
