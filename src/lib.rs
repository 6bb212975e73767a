// only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::struct_excessive_bools)]
//! Channel-based structured logging with per-channel level filtering,
//! configurable pretty-text or JSON output, thread-scoped indentation, and
//! scoped loggers for Start/End blocks, timers and metadata.
//!
//! Messages are logged on a *channel* (an arbitrary case-sensitive name for
//! a functional area, e.g. `NET` or `STORE`) at one of eleven ordered
//! [`Level`]s. A [`LogSpecification`] pairs a default level with per-channel
//! overrides, so verbosity can be turned up for exactly the part of the
//! system under investigation:
//!
//! ```rust
//! use alog::Level;
//!
//! alog::configure(Level::Info, "STORE:debug2").unwrap();
//!
//! let ch = alog::use_channel("STORE");
//! ch.info("starting up");
//! ch.debug2(format_args!("cache warmed with {} entries", 17));
//! ```
//!
//! Rendering of a message is deferred until after the filter check, so a
//! disabled channel costs one map lookup and nothing else.
//!
//! The snippet above uses the process-wide registry; everything is equally
//! available on an explicitly constructed [`LogRegistry`] handle, which is
//! what tests and embedded pipelines use:
//!
//! ```rust
//! use alog::{JsonFormatter, Level, LogRegistry};
//!
//! let registry = LogRegistry::new();
//! registry.configure(Level::Debug, "").unwrap();
//! registry.set_formatter(JsonFormatter::new());
//! registry.channel("MAIN").debug("structured!");
//! ```
//!
//! Scoped loggers bracket a region of code: [`LogScope`] logs
//! `Start:`/`End:` lines and indents everything in between, [`ScopedTimer`]
//! logs the elapsed time on exit, [`ScopedIndent`] and [`ScopedMetadata`]
//! temporarily adjust the calling thread's indentation and key/value
//! metadata. The [`fn_log!`] macro builds a `LogScope` from the enclosing
//! function's name.
//!
//! Output goes to every registered sink (see [`writers`]); the default sink
//! is stderr.

mod alog_error;
mod channel;
mod formats;
mod level;
mod log_specification;
mod macros;
mod record;
mod registry;
mod scopes;
mod temp_config;
mod thread_state;
mod util;
pub mod writers;

pub use crate::alog_error::AlogError;
pub use crate::channel::ChannelLog;
pub use crate::formats::{JsonFormatter, LogFormatter, PrettyFormatter, DEFAULT_CHANNEL_WIDTH};
pub use crate::level::Level;
pub use crate::log_specification::{ChannelMap, LogSpecBuilder, LogSpecification};
pub use crate::record::{is_log_code, LogRecord, Metadata};
pub use crate::registry::LogRegistry;
pub use crate::scopes::{LogScope, ScopedIndent, ScopedMetadata, ScopedTimer};
pub use crate::temp_config::TempConfig;

/// Configures the process-wide registry; see [`LogRegistry::configure`].
///
/// # Errors
///
/// See [`LogSpecification::parse`].
pub fn configure(default_level: Level, filters: &str) -> Result<(), AlogError> {
    LogRegistry::global().configure(default_level, filters)
}

/// A [`ChannelLog`] on the process-wide registry.
#[must_use]
pub fn use_channel(channel: &str) -> ChannelLog {
    LogRegistry::global().channel(channel)
}

/// Resets the process-wide registry to its initial state; see
/// [`LogRegistry::reset`]. Primarily useful between test cases.
pub fn reset() {
    LogRegistry::global().reset();
}
