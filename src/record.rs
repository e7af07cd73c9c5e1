use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a [`LogRecord`].
///
/// Ordered from least to most severe. Each level carries a stable numeric
/// code (stored in the `level` column by the database sink) and an
/// upper-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Numeric severity code.
    pub fn number(self) -> i64 {
        match self {
            Level::Trace => 10,
            Level::Debug => 20,
            Level::Info => 30,
            Level::Warn => 40,
            Level::Error => 50,
        }
    }

    /// Upper-case severity name.
    pub fn name(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::TRACE {
            Level::Trace
        } else if level == tracing::Level::DEBUG {
            Level::Debug
        } else if level == tracing::Level::INFO {
            Level::Info
        } else if level == tracing::Level::WARN {
            Level::Warn
        } else {
            Level::Error
        }
    }
}

/// Captured error information attached to a record: the error kind, its
/// message and the flattened trace lines. An instance with every part empty
/// counts as "no exception" for translation purposes.
#[derive(Debug, Clone, Serialize)]
pub struct ExceptionInfo {
    pub kind: String,
    pub message: String,
    pub trace: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            trace: Vec::new(),
        }
    }

    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.trace = trace;
        self
    }

    /// Build exception info from an error value, flattening its source chain
    /// into one trace line per cause.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut trace = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            trace.push(format!("caused by: {}", cause));
            source = cause.source();
        }
        Self {
            kind: "error".to_string(),
            message: error.to_string(),
            trace,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.message.is_empty() && self.trace.is_empty()
    }

    /// Multi-line rendering: `kind: message` followed by the trace lines.
    pub fn render(&self) -> String {
        let mut out = if self.kind.is_empty() {
            self.message.clone()
        } else if self.message.is_empty() {
            self.kind.clone()
        } else {
            format!("{}: {}", self.kind, self.message)
        };
        for line in &self.trace {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

/// Normalized snapshot of one log call, produced by
/// [`RegistryLayer`](crate::layer::RegistryLayer) or built directly by
/// callers that bypass `tracing`.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// Seconds since the Unix epoch.
    pub created: f64,
    /// Name of the logger this record is addressed to.
    pub logger: Option<String>,
    pub target: String,
    pub module: Option<String>,
    /// Function name when known; `tracing` metadata does not carry one.
    pub function: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub level: Level,
    /// Rendered message, interpolation already applied.
    pub message: Option<String>,
    pub fields: BTreeMap<String, serde_json::Value>,
    pub exception: Option<ExceptionInfo>,
}

impl LogRecord {
    /// New record stamped with the current time. Everything besides `level`
    /// and `target` starts out unset.
    pub fn new(level: Level, target: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            created: now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / 1e9,
            logger: None,
            target: target.into(),
            module: None,
            function: None,
            file: None,
            line: None,
            level,
            message: None,
            fields: BTreeMap::new(),
            exception: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = Some(logger.into());
        self
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Creation time as a local timestamp.
    pub fn timestamp(&self) -> DateTime<Local> {
        let secs = self.created.trunc() as i64;
        let nanos = (self.created.fract() * 1e9) as u32;
        Utc.timestamp_opt(secs, nanos)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
            .with_timezone(&Local)
    }
}

/// The fields a [`LogRecord`] exposes, as a closed set known at compile time.
///
/// Column mappings and format templates refer to fields by these names;
/// [`RecordField::parse`] is the single place a string name becomes a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Created,
    Logger,
    Target,
    Module,
    Function,
    File,
    Line,
    LevelNo,
    LevelName,
    Message,
    Exception,
    Fields,
}

impl RecordField {
    pub const ALL: [RecordField; 12] = [
        RecordField::Created,
        RecordField::Logger,
        RecordField::Target,
        RecordField::Module,
        RecordField::Function,
        RecordField::File,
        RecordField::Line,
        RecordField::LevelNo,
        RecordField::LevelName,
        RecordField::Message,
        RecordField::Exception,
        RecordField::Fields,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RecordField::Created => "created",
            RecordField::Logger => "logger",
            RecordField::Target => "target",
            RecordField::Module => "module",
            RecordField::Function => "function",
            RecordField::File => "file",
            RecordField::Line => "line",
            RecordField::LevelNo => "level_no",
            RecordField::LevelName => "level_name",
            RecordField::Message => "message",
            RecordField::Exception => "exception",
            RecordField::Fields => "fields",
        }
    }

    /// Resolve a field by name, case-insensitively. `None` for names the
    /// record does not expose.
    pub fn parse(name: &str) -> Option<RecordField> {
        let name = name.to_ascii_lowercase();
        RecordField::ALL.iter().copied().find(|f| f.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_order_and_codes() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Warn < Level::Error);
        assert_eq!(Level::Info.number(), 30);
        assert_eq!(Level::Error.name(), "ERROR");
    }

    #[test]
    fn level_from_tracing() {
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Trace);
    }

    #[test]
    fn record_field_parse_is_case_insensitive() {
        assert_eq!(RecordField::parse("Level_Name"), Some(RecordField::LevelName));
        assert_eq!(RecordField::parse("created"), Some(RecordField::Created));
        assert_eq!(RecordField::parse("no_such_field"), None);
    }

    #[test]
    fn every_field_name_round_trips() {
        for field in RecordField::ALL {
            assert_eq!(RecordField::parse(field.name()), Some(field));
        }
    }

    #[test]
    fn exception_render_joins_kind_message_and_trace() {
        let info = ExceptionInfo::new("IoError", "disk full")
            .with_trace(vec!["caused by: quota exceeded".to_string()]);
        assert_eq!(info.render(), "IoError: disk full\ncaused by: quota exceeded");
        assert!(!info.is_empty());
        assert!(ExceptionInfo::new("", "").is_empty());
    }

    #[test]
    fn from_error_flattens_the_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = crate::error::SinkError::from(io);
        let info = ExceptionInfo::from_error(&err);
        assert_eq!(info.message, "I/O error: disk full");
        assert_eq!(info.trace, vec!["caused by: disk full".to_string()]);
        assert_eq!(
            info.render(),
            "error: I/O error: disk full\ncaused by: disk full"
        );
    }

    #[test]
    fn timestamp_converts_epoch_seconds() {
        let mut record = LogRecord::new(Level::Info, "test");
        record.created = 0.0;
        assert_eq!(record.timestamp().with_timezone(&Utc), DateTime::<Utc>::UNIX_EPOCH);
    }
}
