use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

// Classifies internal diagnostics that alog writes about itself to stderr.
// The logging library must never log through itself when it fails.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ErrorCode {
    Format,
    Write,
    Flush,
}

pub(crate) fn eprint_err(code: ErrorCode, msg: &str, err: &dyn std::error::Error) {
    eprintln!("[alog] E-{code:?}: {msg}, caused by {err}");
}

// A panic on another thread must not disable logging, so poisoned locks are
// recovered rather than propagated.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// Writes all lines of one record, newline-terminated, and flushes, while the
// caller holds whatever lock serializes the underlying stream.
pub(crate) fn write_lines(w: &mut dyn Write, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    w.flush()
}
