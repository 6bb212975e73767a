use crate::alog_error::AlogError;
use std::fmt;
use std::str::FromStr;

/// Hierarchical severity scale, ordered from [`Level::Off`] (log nothing) to
/// [`Level::Debug4`] (most verbose).
///
/// A message is written when the effective threshold of its channel is at or
/// above the message's level. `Off` is only valid as a threshold; trying to
/// log *at* `Off` is rejected with [`AlogError::OffNotLoggable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Threshold that suppresses all output. Not a loggable level.
    Off,
    /// Unrecoverable conditions.
    Fatal,
    /// Errors that the application keeps running through.
    Error,
    /// Suspicious but tolerated conditions.
    Warning,
    /// High-level operational messages.
    Info,
    /// Function entry/exit tracing.
    Trace,
    /// Standard debugging.
    Debug,
    /// Finer-grained debugging.
    Debug1,
    /// Finer-grained debugging.
    Debug2,
    /// Finer-grained debugging.
    Debug3,
    /// Most verbose debugging.
    Debug4,
}

impl Level {
    /// All levels, in ascending verbosity.
    pub const ALL: [Level; 11] = [
        Level::Off,
        Level::Fatal,
        Level::Error,
        Level::Warning,
        Level::Info,
        Level::Trace,
        Level::Debug,
        Level::Debug1,
        Level::Debug2,
        Level::Debug3,
        Level::Debug4,
    ];

    /// The lowercase name, as used in filter specs and JSON output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Level::Off => "off",
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Debug1 => "debug1",
            Level::Debug2 => "debug2",
            Level::Debug3 => "debug3",
            Level::Debug4 => "debug4",
        }
    }

    /// The fixed-width four-letter code used in pretty-printed headers.
    #[must_use]
    pub fn header_code(self) -> &'static str {
        match self {
            Level::Fatal => "FATL",
            Level::Error => "ERRR",
            Level::Warning => "WARN",
            Level::Info => "INFO",
            Level::Trace => "TRCE",
            Level::Debug => "DBUG",
            Level::Debug1 => "DBG1",
            Level::Debug2 => "DBG2",
            Level::Debug3 => "DBG3",
            Level::Debug4 => "DBG4",
            Level::Off => "UNKN",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = AlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Level::Off),
            "fatal" => Ok(Level::Fatal),
            "error" => Ok(Level::Error),
            "warning" => Ok(Level::Warning),
            "info" => Ok(Level::Info),
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "debug1" => Ok(Level::Debug1),
            "debug2" => Ok(Level::Debug2),
            "debug3" => Ok(Level::Debug3),
            "debug4" => Ok(Level::Debug4),
            _ => Err(AlogError::LevelParse(s.to_string())),
        }
    }
}
