use crate::alog_error::AlogError;
use crate::level::Level;
use std::collections::BTreeMap;
use std::fmt;

/// Mapping from channel name to the level configured for it.
pub type ChannelMap = BTreeMap<String, Level>;

/// Immutable description of which log lines are to be written, based on the
/// channel and the level.
///
/// A spec consists of a default level and a set of per-channel overrides.
/// Channels without an override use the default; looking up an unknown
/// channel never modifies the spec.
///
/// The string form understood by [`LogSpecification::parse`] is a
/// comma-separated list of `CHANNEL:level` pairs, e.g.
///
/// ```text
/// "MAIN:debug,NET:warning,STORE:debug2"
/// ```
///
/// Level tokens are the lowercase names (`off`, `fatal`, `error`, `warning`,
/// `info`, `trace`, `debug`, `debug1` .. `debug4`). Empty entries (e.g. a
/// trailing comma) are ignored; anything else malformed is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSpecification {
    default_level: Level,
    channel_filters: ChannelMap,
}

impl LogSpecification {
    /// The initial spec: default level `off`, no overrides.
    #[must_use]
    pub fn off() -> Self {
        Self::with_default(Level::Off)
    }

    /// A spec with the given default level and no overrides.
    #[must_use]
    pub fn with_default(default_level: Level) -> Self {
        Self {
            default_level,
            channel_filters: ChannelMap::new(),
        }
    }

    /// Parses a spec from a default level and a filter string.
    ///
    /// An empty filter string means no overrides.
    ///
    /// # Errors
    ///
    /// [`AlogError::BadFilterEntry`] for an entry without exactly one `:`,
    /// [`AlogError::LevelParse`] for an unrecognized level token.
    pub fn parse(default_level: Level, filters: &str) -> Result<Self, AlogError> {
        let mut channel_filters = ChannelMap::new();
        for entry in filters.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let mut parts = entry.split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(channel), Some(level), None) if !channel.is_empty() => {
                    channel_filters.insert(channel.to_string(), level.parse()?);
                }
                _ => return Err(AlogError::BadFilterEntry(entry.to_string())),
            }
        }
        Ok(Self {
            default_level,
            channel_filters,
        })
    }

    /// The default level for channels without an override.
    #[must_use]
    pub fn default_level(&self) -> Level {
        self.default_level
    }

    /// The per-channel overrides.
    #[must_use]
    pub fn channel_filters(&self) -> &ChannelMap {
        &self.channel_filters
    }

    /// The threshold that applies to the given channel.
    #[must_use]
    pub fn effective_level(&self, channel: &str) -> Level {
        self.channel_filters
            .get(channel)
            .copied()
            .unwrap_or(self.default_level)
    }

    /// Whether a message at `level` on `channel` passes the filter.
    ///
    /// Always false for [`Level::Off`], which is not a loggable level.
    #[must_use]
    pub fn enabled(&self, channel: &str, level: Level) -> bool {
        level > Level::Off && self.effective_level(channel) >= level
    }
}

impl fmt::Display for LogSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Default Level: {}", self.default_level)?;
        if !self.channel_filters.is_empty() {
            write!(f, "\nChannel Map:")?;
            for (channel, level) in &self.channel_filters {
                write!(f, "\n  {channel}: {level}")?;
            }
        }
        Ok(())
    }
}

/// Builder for a [`LogSpecification`] assembled in code rather than parsed.
#[derive(Debug)]
pub struct LogSpecBuilder {
    default_level: Level,
    channel_filters: ChannelMap,
}

impl LogSpecBuilder {
    /// Starts a builder with the given default level.
    #[must_use]
    pub fn new(default_level: Level) -> Self {
        Self {
            default_level,
            channel_filters: ChannelMap::new(),
        }
    }

    /// Adds or replaces an override for a channel.
    #[must_use]
    pub fn channel(mut self, channel: &str, level: Level) -> Self {
        self.channel_filters.insert(channel.to_string(), level);
        self
    }

    /// Finalizes the spec.
    #[must_use]
    pub fn build(self) -> LogSpecification {
        LogSpecification {
            default_level: self.default_level,
            channel_filters: self.channel_filters,
        }
    }
}
