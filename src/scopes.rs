use crate::channel::ChannelLog;
use crate::level::Level;
use crate::record::Metadata;
use crate::registry::LogRegistry;
use crate::util::lock;
use serde_json::{json, Value};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub(crate) const SCOPE_START_PREFIX: &str = "Start: ";
pub(crate) const SCOPE_END_PREFIX: &str = "End: ";

// All four guards share the same failure rule: nothing in a constructor or a
// Drop impl may panic or propagate an error into the host application.

/// Start/End log bracket around a scope.
///
/// Construction logs `"Start: {message}"` and indents the calling thread;
/// dropping the guard de-indents and logs `"End: {message}"`. Both are
/// subject to normal filtering, decided once at construction time — the
/// message is not even rendered when the channel/level is disabled, and a
/// scope that did not log its start will not log an end or touch the
/// indentation.
///
/// ```rust
/// # let registry = alog::LogRegistry::new();
/// # let ch = registry.channel("MAIN");
/// {
///     let _scope = ch.log_scope(alog::Level::Debug, "doing work");
///     ch.debug("step 1"); // logged one level deeper
/// } // "End: doing work" here
/// ```
pub struct LogScope {
    registry: LogRegistry,
    channel: String,
    level: Level,
    // None when the scope was disabled at construction time.
    message: Option<String>,
    map: Option<Arc<Mutex<Metadata>>>,
}

impl LogScope {
    /// Opens a scope on the channel handle's channel.
    #[must_use]
    pub fn new(ch: &ChannelLog, level: Level, message: impl fmt::Display) -> Self {
        Self::build(ch, level, None, message)
    }

    /// Opens a scope carrying a live metadata map.
    ///
    /// The map is snapshotted at both the start and the end emission, so
    /// entries added between the two show up in the `End:` line.
    #[must_use]
    pub fn with_map(
        ch: &ChannelLog,
        level: Level,
        map: Arc<Mutex<Metadata>>,
        message: impl fmt::Display,
    ) -> Self {
        Self::build(ch, level, Some(map), message)
    }

    fn build(
        ch: &ChannelLog,
        level: Level,
        map: Option<Arc<Mutex<Metadata>>>,
        message: impl fmt::Display,
    ) -> Self {
        let registry = ch.registry().clone();
        let channel = ch.channel().to_string();
        let message = ch.is_enabled(level).then(|| message.to_string());
        let scope = Self {
            registry,
            channel,
            level,
            message,
            map,
        };
        if let Some(msg) = &scope.message {
            scope.emit(&format!("{SCOPE_START_PREFIX}{msg}"));
            scope.registry.indent();
        }
        scope
    }

    fn emit(&self, message: &str) {
        let metadata = self
            .map
            .as_ref()
            .map_or_else(Metadata::new, |map| lock(map).clone());
        self.registry
            .emit(&self.channel, self.level, || message.to_string(), metadata);
    }
}

impl Drop for LogScope {
    fn drop(&mut self) {
        if let Some(msg) = self.message.take() {
            self.registry.deindent();
            self.emit(&format!("{SCOPE_END_PREFIX}{msg}"));
        }
    }
}

/// Logs the elapsed wall-clock time of a scope when dropped.
///
/// The message acts as a prefix of the rendered duration, so it usually ends
/// with a space or colon: `"setup took "` becomes `"setup took 12ms"`. The
/// duration is scaled to the most readable unit (`ns`, `us`, `ms`, `s`) and
/// also merged into the record metadata as a numeric `duration_ms` field.
///
/// Whether the timer logs is decided by the filter both at construction and
/// at drop time; [`ScopedTimer::current_duration`] can be queried while the
/// scope is still open.
pub struct ScopedTimer {
    registry: LogRegistry,
    channel: String,
    level: Level,
    // None when the timer was disabled at construction time.
    message: Option<String>,
    start: Instant,
    map: Option<Arc<Mutex<Metadata>>>,
}

impl ScopedTimer {
    /// Starts a timer on the channel handle's channel.
    #[must_use]
    pub fn new(ch: &ChannelLog, level: Level, message: impl fmt::Display) -> Self {
        Self::build(ch, level, None, message)
    }

    /// Starts a timer carrying a live metadata map, snapshotted when the
    /// duration is logged.
    #[must_use]
    pub fn with_map(
        ch: &ChannelLog,
        level: Level,
        map: Arc<Mutex<Metadata>>,
        message: impl fmt::Display,
    ) -> Self {
        Self::build(ch, level, Some(map), message)
    }

    fn build(
        ch: &ChannelLog,
        level: Level,
        map: Option<Arc<Mutex<Metadata>>>,
        message: impl fmt::Display,
    ) -> Self {
        Self {
            registry: ch.registry().clone(),
            channel: ch.channel().to_string(),
            level,
            message: ch.is_enabled(level).then(|| message.to_string()),
            start: Instant::now(),
            map,
        }
    }

    /// The time elapsed since construction, while the scope is still open.
    #[must_use]
    pub fn current_duration(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let Some(msg) = self.message.take() else {
            return;
        };
        if !self.registry.is_enabled(&self.channel, self.level) {
            return;
        }
        let elapsed = self.start.elapsed();
        let mut metadata = self
            .map
            .as_ref()
            .map_or_else(Metadata::new, |map| lock(map).clone());
        metadata.insert(
            "duration_ms".to_string(),
            json!(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
        );
        let rendered = format!("{msg}{}", scaled_duration(elapsed));
        self.registry
            .emit(&self.channel, self.level, || rendered, metadata);
    }
}

// Order-of-magnitude ladder; values are truncated, not rounded.
fn scaled_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos < 1_000 {
        format!("{nanos}ns")
    } else if nanos < 1_000_000 {
        format!("{}us", d.as_micros())
    } else if nanos < 100_000_000 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{}s", d.as_secs())
    }
}

/// Indents the calling thread for the lifetime of the guard.
///
/// [`ScopedIndent::new`] indents unconditionally; [`ScopedIndent::new_if`]
/// indents only when the given channel/level is currently enabled, and only
/// de-indents if it indented, so filtered-out scopes cannot drift the
/// indentation of visible ones.
pub struct ScopedIndent {
    registry: LogRegistry,
    enabled: bool,
}

impl ScopedIndent {
    /// Indents unconditionally.
    #[must_use]
    pub fn new(registry: &LogRegistry) -> Self {
        registry.indent();
        Self {
            registry: registry.clone(),
            enabled: true,
        }
    }

    /// Indents only if `level` is enabled on `channel` right now.
    #[must_use]
    pub fn new_if(registry: &LogRegistry, channel: &str, level: Level) -> Self {
        let enabled = registry.is_enabled(channel, level);
        if enabled {
            registry.indent();
        }
        Self {
            registry: registry.clone(),
            enabled,
        }
    }
}

impl Drop for ScopedIndent {
    fn drop(&mut self) {
        if self.enabled {
            self.registry.deindent();
        }
    }
}

/// Adds thread-scoped metadata keys for the lifetime of the guard.
///
/// Dropping the guard removes exactly the keys it introduced. A key that
/// shadowed an outer scope's value reverts to that outer value.
pub struct ScopedMetadata {
    registry: LogRegistry,
    keys: Vec<String>,
}

impl ScopedMetadata {
    /// Pushes a single key.
    #[must_use]
    pub fn new(registry: &LogRegistry, key: &str, value: Value) -> Self {
        registry.push_metadata(key, value);
        Self {
            registry: registry.clone(),
            keys: vec![key.to_string()],
        }
    }

    /// Pushes every key of the map.
    #[must_use]
    pub fn new_map(registry: &LogRegistry, map: Metadata) -> Self {
        let keys = map.keys().cloned().collect();
        for (key, value) in map {
            registry.push_metadata(&key, value);
        }
        Self {
            registry: registry.clone(),
            keys,
        }
    }
}

impl Drop for ScopedMetadata {
    fn drop(&mut self) {
        for key in &self.keys {
            self.registry.pop_metadata(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scaled_duration;
    use std::time::Duration;

    #[test]
    fn duration_ladder_scales_by_magnitude() {
        assert_eq!(scaled_duration(Duration::from_nanos(999)), "999ns");
        assert_eq!(scaled_duration(Duration::from_nanos(1_000)), "1us");
        assert_eq!(scaled_duration(Duration::from_nanos(999_999)), "999us");
        assert_eq!(scaled_duration(Duration::from_nanos(1_000_000)), "1ms");
        assert_eq!(scaled_duration(Duration::from_millis(99)), "99ms");
        assert_eq!(scaled_duration(Duration::from_millis(100)), "0s");
        assert_eq!(scaled_duration(Duration::from_secs(3)), "3s");
    }
}
