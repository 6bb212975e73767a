use crate::alog_error::AlogError;
use crate::level::Level;
use crate::record::LogRecord;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Default width of the channel field in pretty-printed headers.
pub const DEFAULT_CHANNEL_WIDTH: usize = 5;

const INDENT: &str = "  ";

/// Renders a [`LogRecord`] into complete output lines.
///
/// Lines are returned without trailing terminators; the sink appends one
/// `\n` per line. Implementations must be deterministic for identical input.
pub trait LogFormatter: Send + Sync {
    /// Renders the record. An error here is contained by the emission path:
    /// it is reported to stderr and never reaches the application.
    fn format(&self, record: &LogRecord) -> Result<Vec<String>, AlogError>;
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

/// Formatter that pretty-prints records for human consumption.
///
/// Output lines look like
///
/// ```text
/// 2024-03-01T09:30:11.042 <orders> [MAIN :DBUG:2] <ORD1234I>   doing work
/// ```
///
/// with the channel padded or truncated to a fixed width, the level rendered
/// as its four-letter code, and two spaces per indentation level. Multi-line
/// messages repeat the header on every line, and metadata is appended as one
/// `key: value` line per key.
#[derive(Debug, Clone)]
pub struct PrettyFormatter {
    channel_width: usize,
    #[cfg(feature = "colors")]
    colored: bool,
}

impl PrettyFormatter {
    /// A formatter with the default channel width and no coloring.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channel_width: DEFAULT_CHANNEL_WIDTH,
            #[cfg(feature = "colors")]
            colored: false,
        }
    }

    /// Sets the width the channel field is padded or truncated to.
    #[must_use]
    pub fn with_channel_width(mut self, width: usize) -> Self {
        self.channel_width = width;
        self
    }

    /// Enables ANSI coloring of the level code. Meant for terminal sinks;
    /// leave off for file sinks.
    #[cfg(feature = "colors")]
    #[cfg_attr(docsrs, doc(cfg(feature = "colors")))]
    #[must_use]
    pub fn with_colors(mut self) -> Self {
        self.colored = true;
        self
    }

    fn level_code(&self, level: Level) -> String {
        #[cfg(feature = "colors")]
        if self.colored {
            return style_for(level).paint(level.header_code()).to_string();
        }
        level.header_code().to_string()
    }

    fn make_header(&self, record: &LogRecord) -> String {
        let mut header = format_timestamp(&record.timestamp);
        if let Some(service_name) = &record.service_name {
            header.push_str(&format!(" <{service_name}>"));
        }
        let channel: String = if record.channel.len() > self.channel_width {
            record.channel.chars().take(self.channel_width).collect()
        } else {
            format!("{:<width$}", record.channel, width = self.channel_width)
        };
        header.push_str(&format!(" [{channel}:{}", self.level_code(record.level)));
        if let Some(thread_id) = record.thread_id {
            header.push_str(&format!(":{thread_id}"));
        }
        header.push(']');
        if let Some(log_code) = &record.log_code {
            header.push(' ');
            header.push_str(log_code);
        }
        header
    }
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFormatter for PrettyFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<String>, AlogError> {
        let header = self.make_header(record);
        let indent = INDENT.repeat(record.num_indent);
        let mut out = Vec::new();
        if !record.message.is_empty() {
            for line in record.message.split('\n') {
                out.push(format!("{header} {indent}{line}"));
            }
        }
        for (key, value) in &record.metadata {
            append_metadata_lines(&mut out, &header, &indent, 0, key, value);
        }
        Ok(out)
    }
}

// Nested maps recurse with one extra indent level; scalars render on one
// line, with strings quoted.
fn append_metadata_lines(
    out: &mut Vec<String>,
    header: &str,
    indent: &str,
    depth: usize,
    key: &str,
    value: &Value,
) {
    let pad = INDENT.repeat(depth);
    match value {
        Value::Object(map) => {
            out.push(format!("{header} {indent}{pad}{key}:"));
            for (child_key, child_value) in map {
                append_metadata_lines(out, header, indent, depth + 1, child_key, child_value);
            }
        }
        Value::String(s) => out.push(format!("{header} {indent}{pad}{key}: \"{s}\"")),
        other => out.push(format!("{header} {indent}{pad}{key}: {other}")),
    }
}

#[cfg(feature = "colors")]
fn style_for(level: Level) -> nu_ansi_term::Style {
    use nu_ansi_term::Color;
    match level {
        Level::Fatal => Color::Red.bold(),
        Level::Error => Color::Red.normal(),
        Level::Warning => Color::Yellow.normal(),
        Level::Trace | Level::Debug | Level::Debug1 | Level::Debug2 | Level::Debug3
        | Level::Debug4 => Color::DarkGray.normal(),
        Level::Info | Level::Off => nu_ansi_term::Style::new(),
    }
}

/// Formatter that renders each record as one single-line JSON object.
///
/// Metadata keys are merged at the top level; the standard fields `channel`,
/// `level_str`, `timestamp` and `num_indent` are always present and win over
/// colliding metadata keys. `message`, `thread_id`, `service_name` and
/// `log_code` appear only when set. Keys serialize in lexicographic order so
/// the output is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Constructs the formatter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LogFormatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<String>, AlogError> {
        let mut fields: BTreeMap<String, Value> = record
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        fields.insert("channel".to_string(), json!(record.channel));
        fields.insert("level_str".to_string(), json!(record.level.name()));
        fields.insert(
            "timestamp".to_string(),
            json!(format_timestamp(&record.timestamp)),
        );
        fields.insert("num_indent".to_string(), json!(record.num_indent));
        if !record.message.is_empty() {
            fields.insert("message".to_string(), json!(record.message));
        }
        if let Some(thread_id) = record.thread_id {
            fields.insert("thread_id".to_string(), json!(thread_id));
        }
        if let Some(service_name) = &record.service_name {
            fields.insert("service_name".to_string(), json!(service_name));
        }
        if let Some(log_code) = &record.log_code {
            fields.insert("log_code".to_string(), json!(log_code));
        }
        Ok(vec![serde_json::to_string(&fields)?])
    }
}
