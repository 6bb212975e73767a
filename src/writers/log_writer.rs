use std::io;

/// Writes to a single log output stream.
///
/// The registry calls [`LogWriter::write`] once per emitted record, with all
/// of the record's formatted lines. Implementations serialize concurrent
/// calls internally (a lock per sink, not one global emission lock), so a
/// record's lines are never interleaved with another record's lines on the
/// same sink, while writes to different sinks proceed independently.
pub trait LogWriter: Send + Sync {
    /// Writes all lines of one record, appending a line terminator to each.
    ///
    /// # Errors
    ///
    /// If writing to the underlying stream fails. The registry reports the
    /// failure to stderr and continues with the remaining sinks.
    fn write(&self, lines: &[String]) -> io::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// If the underlying stream fails to flush.
    fn flush(&self) -> io::Result<()>;
}
