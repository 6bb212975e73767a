//! Sinks that receive formatted log lines.
//!
//! The registry fans every emitted record out to all registered sinks. A sink
//! is anything implementing [`LogWriter`]; the built-in implementations cover
//! the standard streams ([`StdWriter`]), plain files ([`FileWriter`]) and an
//! in-memory ring buffer ([`BufferWriter`]) that is mainly useful in tests
//! and for exposing recent log lines inside an application.

mod buffer_writer;
mod file_writer;
mod log_writer;
mod std_writer;

pub use buffer_writer::{BufferWriter, Snapshot};
pub use file_writer::FileWriter;
pub use log_writer::LogWriter;
pub use std_writer::StdWriter;
