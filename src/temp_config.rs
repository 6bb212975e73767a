use crate::alog_error::AlogError;
use crate::level::Level;
use crate::log_specification::LogSpecification;
use crate::registry::LogRegistry;
use crate::util::lock;
use std::sync::{Arc, Mutex};
use std::thread::Builder as ThreadBuilder;
use std::time::Duration;

const REVERT_THREAD: &str = "alog-temp-config-revert";
const DYLOG_CHANNEL: &str = "DYLOG";

/// Applies a temporary filter configuration to a registry and reverts it
/// after a timeout.
///
/// This is a collaborator built on top of [`LogRegistry::configure`], meant
/// for "turn up logging for a minute" style runtime endpoints. Only one
/// temporary window may be active per `TempConfig` at a time; overlapping
/// requests are rejected with [`AlogError::TempConfigActive`]. The revert
/// runs on a background thread and restores the spec that was active when
/// the window was opened.
pub struct TempConfig {
    registry: LogRegistry,
    window_active: Arc<Mutex<bool>>,
}

impl TempConfig {
    /// Creates a temporary-configuration gate for the registry.
    #[must_use]
    pub fn new(registry: LogRegistry) -> Self {
        Self {
            registry,
            window_active: Arc::new(Mutex::new(false)),
        }
    }

    /// Applies `default_level` and `filters` now and reverts to the current
    /// spec after `timeout`.
    ///
    /// # Errors
    ///
    /// Parse errors from the filter string (the registry is left untouched),
    /// [`AlogError::TempConfigActive`] when a window is already open, or
    /// [`AlogError::Io`] if the revert thread cannot be spawned (the spec is
    /// restored immediately in that case).
    pub fn apply(
        &self,
        default_level: Level,
        filters: &str,
        timeout: Duration,
    ) -> Result<(), AlogError> {
        let spec = LogSpecification::parse(default_level, filters)?;

        let mut active = lock(&self.window_active);
        if *active {
            return Err(AlogError::TempConfigActive);
        }

        let ch = self.registry.channel(DYLOG_CHANNEL);
        let previous = self.registry.spec();
        ch.info(format_args!("Before adjustment:\n{previous}"));
        self.registry.set_spec(spec);
        ch.info(format_args!("After adjustment:\n{}", self.registry.spec()));
        ch.info(format_args!(
            "Setting up adjustment to time out in {timeout:?}"
        ));

        let registry = self.registry.clone();
        let window = Arc::clone(&self.window_active);
        let revert_spec = previous.clone();
        let spawned = ThreadBuilder::new()
            .name(REVERT_THREAD.to_string())
            .spawn(move || {
                std::thread::sleep(timeout);
                registry
                    .channel(DYLOG_CHANNEL)
                    .info("Resetting logging after timed adjust");
                registry.set_spec(revert_spec);
                *lock(&window) = false;
            });
        match spawned {
            Ok(_) => {
                *active = true;
                Ok(())
            }
            Err(e) => {
                self.registry.set_spec(previous);
                Err(AlogError::Io(e))
            }
        }
    }

    /// Whether a temporary window is currently open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *lock(&self.window_active)
    }
}
