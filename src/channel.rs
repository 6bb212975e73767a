use crate::alog_error::AlogError;
use crate::level::Level;
use crate::record::Metadata;
use crate::registry::LogRegistry;
use crate::scopes::{LogScope, ScopedIndent, ScopedMetadata, ScopedTimer};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Logs to a fixed channel through a shared registry handle.
///
/// The usual pattern is one handle per logically grouped piece of
/// functionality, held by the struct that implements it:
///
/// ```rust
/// use alog::{Level, LogRegistry};
///
/// struct Store {
///     ch: alog::ChannelLog,
/// }
///
/// impl Store {
///     fn new(registry: &LogRegistry) -> Self {
///         Self { ch: registry.channel("STORE") }
///     }
///
///     fn put(&self, key: &str) {
///         let _scope = alog::fn_log!(self.ch);
///         self.ch.debug(format_args!("storing {key}"));
///     }
/// }
/// ```
///
/// Message arguments are anything `Display`; rendering is deferred until
/// after the filter check, so a `format_args!` message costs nothing when
/// the channel is disabled.
#[derive(Clone)]
pub struct ChannelLog {
    registry: LogRegistry,
    channel: String,
}

impl ChannelLog {
    pub(crate) fn new(registry: LogRegistry, channel: &str) -> Self {
        Self {
            registry,
            channel: channel.to_string(),
        }
    }

    /// The bound channel name.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The registry this handle logs through.
    #[must_use]
    pub fn registry(&self) -> &LogRegistry {
        &self.registry
    }

    /// Whether a message at `level` on this channel would be written.
    #[must_use]
    pub fn is_enabled(&self, level: Level) -> bool {
        self.registry.is_enabled(&self.channel, level)
    }

    /// Logs a message at the given level.
    ///
    /// # Errors
    ///
    /// [`AlogError::OffNotLoggable`] if `level` is [`Level::Off`].
    pub fn log(&self, level: Level, message: impl fmt::Display) -> Result<(), AlogError> {
        self.registry.log(&self.channel, level, message)
    }

    /// Logs a lazily generated message; the generator only runs when the
    /// level is enabled.
    ///
    /// # Errors
    ///
    /// [`AlogError::OffNotLoggable`] if `level` is [`Level::Off`].
    pub fn log_with<F>(&self, level: Level, message: F) -> Result<(), AlogError>
    where
        F: FnOnce() -> String,
    {
        self.registry.log_with(&self.channel, level, message)
    }

    /// Logs a metadata-only entry.
    ///
    /// # Errors
    ///
    /// [`AlogError::OffNotLoggable`] if `level` is [`Level::Off`].
    pub fn log_map(&self, level: Level, metadata: Metadata) -> Result<(), AlogError> {
        self.registry.log_map(&self.channel, level, metadata)
    }

    /// Logs a message with additional structured metadata.
    ///
    /// # Errors
    ///
    /// [`AlogError::OffNotLoggable`] if `level` is [`Level::Off`].
    pub fn log_with_map(
        &self,
        level: Level,
        metadata: Metadata,
        message: impl fmt::Display,
    ) -> Result<(), AlogError> {
        self.registry
            .log_with_map(&self.channel, level, metadata, message)
    }

    /// Logs at [`Level::Fatal`].
    pub fn fatal(&self, message: impl fmt::Display) {
        self.emit(Level::Fatal, message);
    }

    /// Logs at [`Level::Error`].
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(Level::Error, message);
    }

    /// Logs at [`Level::Warning`].
    pub fn warning(&self, message: impl fmt::Display) {
        self.emit(Level::Warning, message);
    }

    /// Logs at [`Level::Info`].
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(Level::Info, message);
    }

    /// Logs at [`Level::Trace`].
    pub fn trace(&self, message: impl fmt::Display) {
        self.emit(Level::Trace, message);
    }

    /// Logs at [`Level::Debug`].
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(Level::Debug, message);
    }

    /// Logs at [`Level::Debug1`].
    pub fn debug1(&self, message: impl fmt::Display) {
        self.emit(Level::Debug1, message);
    }

    /// Logs at [`Level::Debug2`].
    pub fn debug2(&self, message: impl fmt::Display) {
        self.emit(Level::Debug2, message);
    }

    /// Logs at [`Level::Debug3`].
    pub fn debug3(&self, message: impl fmt::Display) {
        self.emit(Level::Debug3, message);
    }

    /// Logs at [`Level::Debug4`].
    pub fn debug4(&self, message: impl fmt::Display) {
        self.emit(Level::Debug4, message);
    }

    fn emit(&self, level: Level, message: impl fmt::Display) {
        self.registry
            .emit(&self.channel, level, || message.to_string(), Metadata::new());
    }

    //-- scoped loggers --------------------------------------------------------

    /// A Start/End scope on this channel; see [`LogScope`].
    #[must_use]
    pub fn log_scope(&self, level: Level, message: impl fmt::Display) -> LogScope {
        LogScope::new(self, level, message)
    }

    /// A Start/End scope whose metadata map is re-read at scope exit; see
    /// [`LogScope::with_map`].
    #[must_use]
    pub fn log_scope_with_map(
        &self,
        level: Level,
        map: Arc<Mutex<Metadata>>,
        message: impl fmt::Display,
    ) -> LogScope {
        LogScope::with_map(self, level, map, message)
    }

    /// A timer that logs its elapsed duration when dropped; see
    /// [`ScopedTimer`]. The message is used as a prefix of the duration.
    #[must_use]
    pub fn scoped_timer(&self, level: Level, message: impl fmt::Display) -> ScopedTimer {
        ScopedTimer::new(self, level, message)
    }

    /// A scoped timer whose metadata map is re-read when the duration is
    /// logged; see [`ScopedTimer::with_map`].
    #[must_use]
    pub fn scoped_timer_with_map(
        &self,
        level: Level,
        map: Arc<Mutex<Metadata>>,
        message: impl fmt::Display,
    ) -> ScopedTimer {
        ScopedTimer::with_map(self, level, map, message)
    }

    /// Indents the calling thread for the lifetime of the returned guard.
    #[must_use]
    pub fn scoped_indent(&self) -> ScopedIndent {
        ScopedIndent::new(&self.registry)
    }

    /// Indents only if `level` is currently enabled on this channel, so
    /// filtered-out scopes do not shift the indentation of visible ones.
    #[must_use]
    pub fn scoped_indent_if(&self, level: Level) -> ScopedIndent {
        ScopedIndent::new_if(&self.registry, &self.channel, level)
    }

    /// Adds a thread-scoped metadata key for the lifetime of the returned
    /// guard.
    #[must_use]
    pub fn scoped_metadata(&self, key: &str, value: Value) -> ScopedMetadata {
        ScopedMetadata::new(&self.registry, key, value)
    }

    /// Adds several thread-scoped metadata keys for the lifetime of the
    /// returned guard.
    #[must_use]
    pub fn scoped_metadata_map(&self, map: Metadata) -> ScopedMetadata {
        ScopedMetadata::new_map(&self.registry, map)
    }

    /// Builds the `name(args)` Start/End scope used by the function-trace
    /// macros; `raw_fn_name` is shortened to its last path segment unless
    /// the registry's full-function-signature toggle is on.
    #[must_use]
    pub fn fn_scope(&self, level: Level, raw_fn_name: &str, args: fmt::Arguments<'_>) -> LogScope {
        let name = if self.registry.full_func_sig_enabled() {
            raw_fn_name
        } else {
            raw_fn_name.rsplit("::").next().unwrap_or(raw_fn_name)
        };
        LogScope::new(self, level, format_args!("{name}({args})"))
    }
}
