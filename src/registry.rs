use crate::alog_error::AlogError;
use crate::channel::ChannelLog;
use crate::formats::{LogFormatter, PrettyFormatter};
use crate::level::Level;
use crate::log_specification::LogSpecification;
use crate::record::{split_log_code, LogRecord, Metadata};
use crate::thread_state::{current_thread_id, ThreadStates};
use crate::util::{eprint_err, lock, ErrorCode};
use crate::writers::{LogWriter, StdWriter};
use std::fmt;
use std::sync::{Arc, LazyLock, Mutex};

// Mutable configuration, all behind one registry-wide lock. The emission
// path snapshots what it needs and releases the lock before formatting and
// writing.
struct Config {
    spec: LogSpecification,
    formatter: Arc<dyn LogFormatter>,
    service_name: String,
    thread_id_enabled: bool,
    metadata_enabled: bool,
    indent_enabled: bool,
    full_func_sig_enabled: bool,
}

impl Config {
    fn initial() -> Self {
        Self {
            spec: LogSpecification::off(),
            formatter: Arc::new(PrettyFormatter::new()),
            service_name: String::new(),
            thread_id_enabled: false,
            metadata_enabled: false,
            indent_enabled: true,
            full_func_sig_enabled: false,
        }
    }
}

struct RegistryInner {
    config: Mutex<Config>,
    sinks: Mutex<Vec<Arc<dyn LogWriter>>>,
    thread_states: ThreadStates,
}

fn default_sinks() -> Vec<Arc<dyn LogWriter>> {
    vec![Arc::new(StdWriter::stderr())]
}

/// Shared handle to a logging configuration and its emission pipeline.
///
/// A `LogRegistry` owns the filter spec, the formatter, the sinks and the
/// per-thread indentation/metadata state. Handles are cheap to clone and all
/// clones refer to the same state, so the usual pattern is to configure one
/// registry at startup and hand [`ChannelLog`] handles to the rest of the
/// application.
///
/// Most applications use the process-wide instance via
/// [`LogRegistry::global`] (or the crate-root convenience functions); an
/// explicitly constructed registry behaves identically and is handy in tests
/// or for embedding several independently-configured pipelines.
///
/// In its initial state a registry has default level [`Level::Off`], no
/// channel overrides, the pretty formatter, and a single stderr sink.
#[derive(Clone)]
pub struct LogRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LogRegistry {
    /// Creates an independent registry in the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                config: Mutex::new(Config::initial()),
                sinks: Mutex::new(default_sinks()),
                thread_states: ThreadStates::default(),
            }),
        }
    }

    /// The process-wide registry instance.
    pub fn global() -> &'static LogRegistry {
        static GLOBAL: LazyLock<LogRegistry> = LazyLock::new(LogRegistry::new);
        &GLOBAL
    }

    //-- configuration ---------------------------------------------------------

    /// Parses `filters` (`"CH1:level1,CH2:level2"`, empty for no overrides)
    /// and atomically replaces the default level and the channel overrides.
    ///
    /// Sinks, formatter and per-thread state are not touched. On error the
    /// previous spec stays in place.
    ///
    /// # Errors
    ///
    /// See [`LogSpecification::parse`].
    pub fn configure(&self, default_level: Level, filters: &str) -> Result<(), AlogError> {
        let spec = LogSpecification::parse(default_level, filters)?;
        self.set_spec(spec);
        Ok(())
    }

    /// Replaces the filter spec.
    pub fn set_spec(&self, spec: LogSpecification) {
        lock(&self.inner.config).spec = spec;
    }

    /// The current filter spec.
    #[must_use]
    pub fn spec(&self) -> LogSpecification {
        lock(&self.inner.config).spec.clone()
    }

    /// Replaces the formatter.
    pub fn set_formatter(&self, formatter: impl LogFormatter + 'static) {
        lock(&self.inner.config).formatter = Arc::new(formatter);
    }

    /// Replaces all sinks with the given one.
    pub fn set_sink(&self, sink: Arc<dyn LogWriter>) {
        *lock(&self.inner.sinks) = vec![sink];
    }

    /// Registers an additional sink; every emitted record goes to all sinks.
    pub fn add_sink(&self, sink: Arc<dyn LogWriter>) {
        lock(&self.inner.sinks).push(sink);
    }

    /// Drops all registered sinks and restores the default stderr sink.
    pub fn reset_sinks(&self) {
        *lock(&self.inner.sinks) = default_sinks();
    }

    /// Flushes every sink.
    pub fn flush(&self) {
        let sinks = lock(&self.inner.sinks).clone();
        for sink in sinks {
            if let Err(e) = sink.flush() {
                eprint_err(ErrorCode::Flush, "flushing a sink failed", &e);
            }
        }
    }

    /// Sets the service name shown in every record. Empty means not shown.
    pub fn set_service_name(&self, name: &str) {
        lock(&self.inner.config).service_name = name.to_string();
    }

    /// Includes the calling thread's id in every record.
    pub fn enable_thread_id(&self) {
        lock(&self.inner.config).thread_id_enabled = true;
    }

    /// Stops including thread ids.
    pub fn disable_thread_id(&self) {
        lock(&self.inner.config).thread_id_enabled = false;
    }

    /// Merges the calling thread's scoped metadata into every record.
    pub fn enable_metadata(&self) {
        lock(&self.inner.config).metadata_enabled = true;
    }

    /// Stops merging thread-scoped metadata (call-supplied metadata is
    /// always included).
    pub fn disable_metadata(&self) {
        lock(&self.inner.config).metadata_enabled = false;
    }

    /// Enables indentation tracking (the initial state).
    pub fn enable_indent(&self) {
        lock(&self.inner.config).indent_enabled = true;
    }

    /// Disables indentation tracking; records report depth 0.
    pub fn disable_indent(&self) {
        lock(&self.inner.config).indent_enabled = false;
    }

    /// Makes function-trace scopes log fully qualified function names.
    pub fn enable_full_func_sig(&self) {
        lock(&self.inner.config).full_func_sig_enabled = true;
    }

    /// Makes function-trace scopes log bare function names (the initial
    /// state).
    pub fn disable_full_func_sig(&self) {
        lock(&self.inner.config).full_func_sig_enabled = false;
    }

    pub(crate) fn full_func_sig_enabled(&self) -> bool {
        lock(&self.inner.config).full_func_sig_enabled
    }

    /// Restores the initial state: spec off, pretty formatter, default
    /// stderr sink, no service name, all toggles back to their defaults,
    /// and all per-thread state dropped.
    pub fn reset(&self) {
        *lock(&self.inner.config) = Config::initial();
        *lock(&self.inner.sinks) = default_sinks();
        self.inner.thread_states.clear();
    }

    //-- filtering and emission ------------------------------------------------

    /// Whether a message at `level` on `channel` would currently be written.
    ///
    /// Returns false for [`Level::Off`]; the `log*` entry points report that
    /// case as [`AlogError::OffNotLoggable`] instead.
    #[must_use]
    pub fn is_enabled(&self, channel: &str, level: Level) -> bool {
        lock(&self.inner.config).spec.enabled(channel, level)
    }

    /// Logs a message. The message's `Display` impl runs only if the
    /// channel/level is enabled.
    ///
    /// # Errors
    ///
    /// [`AlogError::OffNotLoggable`] if `level` is [`Level::Off`].
    pub fn log(
        &self,
        channel: &str,
        level: Level,
        message: impl fmt::Display,
    ) -> Result<(), AlogError> {
        self.log_with_map(channel, level, Metadata::new(), message)
    }

    /// Logs a lazily generated message; the generator is not invoked when
    /// the channel/level is disabled.
    ///
    /// # Errors
    ///
    /// [`AlogError::OffNotLoggable`] if `level` is [`Level::Off`].
    pub fn log_with<F>(&self, channel: &str, level: Level, message: F) -> Result<(), AlogError>
    where
        F: FnOnce() -> String,
    {
        if level == Level::Off {
            return Err(AlogError::OffNotLoggable);
        }
        self.emit(channel, level, message, Metadata::new());
        Ok(())
    }

    /// Logs a metadata-only entry (no message).
    ///
    /// # Errors
    ///
    /// [`AlogError::OffNotLoggable`] if `level` is [`Level::Off`].
    pub fn log_map(
        &self,
        channel: &str,
        level: Level,
        metadata: Metadata,
    ) -> Result<(), AlogError> {
        if level == Level::Off {
            return Err(AlogError::OffNotLoggable);
        }
        self.emit(channel, level, String::new, metadata);
        Ok(())
    }

    /// Logs a message with additional structured metadata; call-supplied
    /// keys win over thread-scoped ones.
    ///
    /// # Errors
    ///
    /// [`AlogError::OffNotLoggable`] if `level` is [`Level::Off`].
    pub fn log_with_map(
        &self,
        channel: &str,
        level: Level,
        metadata: Metadata,
        message: impl fmt::Display,
    ) -> Result<(), AlogError> {
        if level == Level::Off {
            return Err(AlogError::OffNotLoggable);
        }
        self.emit(channel, level, || message.to_string(), metadata);
        Ok(())
    }

    // The emission pipeline. Callers have ruled out Level::Off.
    pub(crate) fn emit<F>(&self, channel: &str, level: Level, message: F, call_metadata: Metadata)
    where
        F: FnOnce() -> String,
    {
        let (formatter, service_name, thread_id_enabled, metadata_enabled, indent_enabled) = {
            let config = lock(&self.inner.config);
            if !config.spec.enabled(channel, level) {
                return;
            }
            (
                Arc::clone(&config.formatter),
                config.service_name.clone(),
                config.thread_id_enabled,
                config.metadata_enabled,
                config.indent_enabled,
            )
        };

        let (log_code, message) = split_log_code(message());

        let mut metadata = if metadata_enabled {
            self.inner.thread_states.metadata_snapshot()
        } else {
            Metadata::new()
        };
        metadata.extend(call_metadata);

        let record = LogRecord {
            channel: channel.to_string(),
            level,
            message,
            timestamp: chrono::Utc::now(),
            num_indent: if indent_enabled {
                self.inner.thread_states.indent_depth()
            } else {
                0
            },
            thread_id: thread_id_enabled.then(current_thread_id),
            service_name: (!service_name.is_empty()).then_some(service_name),
            log_code,
            metadata,
        };

        let lines = match formatter.format(&record) {
            Ok(lines) => lines,
            Err(e) => {
                // best effort: the raw message still reaches stderr
                eprint_err(ErrorCode::Format, &record.message, &e);
                return;
            }
        };
        if lines.is_empty() {
            return;
        }

        // Snapshot the sink list so concurrent emits to different sinks do
        // not serialize on the registry; each sink orders its own writes.
        let sinks = lock(&self.inner.sinks).clone();
        for sink in sinks {
            if let Err(e) = sink.write(&lines) {
                eprint_err(ErrorCode::Write, "writing to a sink failed", &e);
            }
        }
    }

    //-- per-thread state ------------------------------------------------------

    /// Increases the calling thread's indentation depth by one, when
    /// indentation tracking is enabled.
    pub fn indent(&self) {
        if lock(&self.inner.config).indent_enabled {
            self.inner.thread_states.indent();
        }
    }

    /// Decreases the calling thread's indentation depth by one; already-zero
    /// depth stays at zero.
    pub fn deindent(&self) {
        if lock(&self.inner.config).indent_enabled {
            self.inner.thread_states.deindent();
        }
    }

    /// The calling thread's current indentation depth.
    #[must_use]
    pub fn indent_depth(&self) -> usize {
        self.inner.thread_states.indent_depth()
    }

    /// Pushes a metadata key for the calling thread; shadows an outer value
    /// for the same key until the matching [`LogRegistry::pop_metadata`].
    pub fn push_metadata(&self, key: &str, value: serde_json::Value) {
        self.inner.thread_states.push_metadata(key, value);
    }

    /// Pops the calling thread's innermost value for the key; the outer
    /// value, if any, becomes visible again.
    pub fn pop_metadata(&self, key: &str) {
        self.inner.thread_states.pop_metadata(key);
    }

    /// Drops all of the calling thread's metadata.
    pub fn clear_metadata(&self) {
        self.inner.thread_states.clear_metadata();
    }

    /// The calling thread's currently visible scoped metadata.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        self.inner.thread_states.metadata_snapshot()
    }

    //-- channels --------------------------------------------------------------

    /// A [`ChannelLog`] bound to this registry and the given channel.
    #[must_use]
    pub fn channel(&self, channel: &str) -> ChannelLog {
        ChannelLog::new(self.clone(), channel)
    }
}
