use crate::util::{lock, write_lines};
use crate::writers::LogWriter;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

/// Sink that appends to a single log file.
///
/// Writes are unbuffered and pushed to the OS per record, so lines stay
/// visible if the process crashes. There is no rotation; the file grows
/// until something outside the process truncates it.
pub struct FileWriter {
    file: Mutex<File>,
}

impl FileWriter {
    /// Opens (or creates) the file for appending.
    ///
    /// # Errors
    ///
    /// If the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogWriter for FileWriter {
    fn write(&self, lines: &[String]) -> io::Result<()> {
        write_lines(&mut *lock(&self.file), lines)
    }

    fn flush(&self) -> io::Result<()> {
        use std::io::Write;
        lock(&self.file).flush()
    }
}
