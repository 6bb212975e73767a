use crate::level::Level;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered key/value data attached to log records.
///
/// The map is ordered so that both formatters render keys deterministically.
pub type Metadata = BTreeMap<String, Value>;

/// A single log emission, fully resolved.
///
/// Records are built fresh for every emission and handed to the formatter;
/// they have no identity beyond their contents.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// The channel the message was logged on.
    pub channel: String,
    /// The level the message was logged at. Never [`Level::Off`].
    pub level: Level,
    /// The rendered message. May be empty for metadata-only entries.
    pub message: String,
    /// UTC creation time.
    pub timestamp: DateTime<Utc>,
    /// Indentation depth of the calling thread at emission time.
    pub num_indent: usize,
    /// Numeric id of the calling thread, when thread-id display is enabled.
    pub thread_id: Option<u64>,
    /// The configured service name, when one is set.
    pub service_name: Option<String>,
    /// A `<...>` log-code token extracted from the message, if present.
    pub log_code: Option<String>,
    /// Merged thread-local and call-supplied metadata.
    pub metadata: Metadata,
}

/// Whether a string has the shape of a log-code token: framed by angle
/// brackets and free of whitespace, e.g. `<SERV12345I>`.
#[must_use]
pub fn is_log_code(s: &str) -> bool {
    s.len() > 2
        && s.starts_with('<')
        && s.ends_with('>')
        && !s.contains(char::is_whitespace)
}

/// Splits a leading log-code token off a message.
///
/// Returns `(Some(code), rest)` when the message starts with a `<...>` token
/// followed by a space (or is the token alone), else `(None, message)`.
pub(crate) fn split_log_code(message: String) -> (Option<String>, String) {
    if message.starts_with('<') {
        if let Some(end) = message.find('>') {
            let (code, tail) = message.split_at(end + 1);
            if is_log_code(code) {
                if tail.is_empty() {
                    return (Some(message), String::new());
                }
                if let Some(rest) = tail.strip_prefix(' ') {
                    return (Some(code.to_string()), rest.to_string());
                }
            }
        }
    }
    (None, message)
}

#[cfg(test)]
mod tests {
    use super::{is_log_code, split_log_code};

    #[test]
    fn log_code_shape() {
        assert!(is_log_code("<SERV12345I>"));
        assert!(!is_log_code("<has space>"));
        assert!(!is_log_code("<>"));
        assert!(!is_log_code("plain"));
        assert!(!is_log_code("<unclosed"));
    }

    #[test]
    fn split_extracts_leading_code() {
        let (code, msg) = split_log_code("<SERV12345I> hello".to_string());
        assert_eq!(code.as_deref(), Some("<SERV12345I>"));
        assert_eq!(msg, "hello");
    }

    #[test]
    fn split_leaves_plain_messages_alone() {
        let (code, msg) = split_log_code("no code here".to_string());
        assert!(code.is_none());
        assert_eq!(msg, "no code here");

        let (code, msg) = split_log_code("<a b> not a code".to_string());
        assert!(code.is_none());
        assert_eq!(msg, "<a b> not a code");
    }

    #[test]
    fn split_accepts_bare_code() {
        let (code, msg) = split_log_code("<SERV12345I>".to_string());
        assert_eq!(code.as_deref(), Some("<SERV12345I>"));
        assert!(msg.is_empty());
    }
}
