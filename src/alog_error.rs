use thiserror::Error;

/// Describes errors from configuration and from the emission pipeline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AlogError {
    /// A channel filter entry was not of the form `CHANNEL:level`.
    #[error("bad channel filter entry [{0}]")]
    BadFilterEntry(String),

    /// A level token could not be parsed.
    #[error("invalid log level [{0}]")]
    LevelParse(String),

    /// `Level::Off` is only valid as a threshold, not as a level to log at.
    #[error("cannot log at level [off]")]
    OffNotLoggable,

    /// A formatter failed while rendering a record.
    #[error("formatting failed: {0}")]
    Format(String),

    /// Serializing a structured log line failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A temporary configuration window is already active.
    #[error("cannot apply overlapping temporary configurations")]
    TempConfigActive,

    /// Writing to a sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
