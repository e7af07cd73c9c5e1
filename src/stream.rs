use crate::error::Result;
use crate::format::LineFormat;
use crate::record::{Level, LogRecord};
use crate::registry::Registry;
use crate::sink::{Sink, SinkKind};
use std::fmt;
use std::io::Write;

/// Where a [`StreamSink`] writes.
pub enum StreamTarget {
    Stderr,
    Stdout,
    /// Any other writer, e.g. a pipe or an in-memory buffer.
    Writer(Box<dyn Write + Send>),
}

impl Default for StreamTarget {
    fn default() -> Self {
        StreamTarget::Stderr
    }
}

impl fmt::Debug for StreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamTarget::Stderr => f.write_str("Stderr"),
            StreamTarget::Stdout => f.write_str("Stdout"),
            StreamTarget::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Configuration for [`attach_stream_sink`].
#[derive(Debug)]
pub struct StreamSinkConfig {
    /// Logger to attach to; `None` means the root logger.
    pub logger: Option<String>,
    pub target: StreamTarget,
    /// Threshold applied to the logger itself; `None` leaves it untouched.
    pub logger_level: Option<Level>,
    pub sink_level: Level,
    pub format: LineFormat,
}

impl StreamSinkConfig {
    pub fn new() -> Self {
        Self {
            logger: None,
            target: StreamTarget::Stderr,
            logger_level: Some(Level::Trace),
            sink_level: Level::Trace,
            format: LineFormat::default(),
        }
    }
}

impl Default for StreamSinkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink that writes one formatted line per record to a stream, standard
/// error by default.
pub struct StreamSink {
    target: StreamTarget,
    level: Level,
    format: LineFormat,
}

impl StreamSink {
    pub fn new(target: StreamTarget, level: Level, format: LineFormat) -> Self {
        Self {
            target,
            level,
            format,
        }
    }
}

impl Sink for StreamSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.format.render(record)?;
        match &mut self.target {
            StreamTarget::Stderr => {
                let mut stderr = std::io::stderr().lock();
                stderr.write_all(line.as_bytes())?;
                stderr.write_all(b"\n")?;
            }
            StreamTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(line.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
            StreamTarget::Writer(writer) => {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
        }
        Ok(())
    }

    fn level(&self) -> Level {
        self.level
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Stream
    }
}

/// Attach a stream sink to the configured logger.
///
/// Resolves (or creates) the logger, applies `logger_level` when given, and
/// scans the already-attached sinks for *any* stream sink. The
/// de-duplication key is the sink type alone, not the target stream: a
/// second call with a different target is a no-op when a stream sink is
/// already attached.
pub fn attach_stream_sink(registry: &Registry, config: StreamSinkConfig) -> Result<()> {
    let logger = registry.logger(config.logger.as_deref());
    if let Some(level) = config.logger_level {
        logger.set_level(level);
    }

    if logger.is_attached(&SinkKind::Stream) {
        return Ok(());
    }

    let sink = StreamSink::new(config.target, config.sink_level, config.format);
    logger.attach(Box::new(sink));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn attach_is_idempotent_by_type_regardless_of_target() {
        let registry = Registry::new();

        let mut first = StreamSinkConfig::new();
        first.logger = Some("console".to_string());
        first.target = StreamTarget::Writer(Box::new(SharedBuffer::default()));
        attach_stream_sink(&registry, first).unwrap();

        // Different target, same logger: still a no-op.
        let mut second = StreamSinkConfig::new();
        second.logger = Some("console".to_string());
        second.target = StreamTarget::Stdout;
        attach_stream_sink(&registry, second).unwrap();

        assert_eq!(registry.logger(Some("console")).sink_count(), 1);
    }

    #[test]
    fn emitted_lines_reach_the_writer() {
        let registry = Registry::new();
        let buffer = SharedBuffer::default();

        let mut config = StreamSinkConfig::new();
        config.logger = Some("buffered".to_string());
        config.target = StreamTarget::Writer(Box::new(buffer.clone()));
        config.format = LineFormat::Template("{level_name}: {message}".to_string());
        attach_stream_sink(&registry, config).unwrap();

        let logger = registry.logger(Some("buffered"));
        logger.handle(&LogRecord::new(Level::Warn, "t").with_message("heads up"));

        assert_eq!(buffer.contents(), "WARN: heads up\n");
    }

    #[test]
    fn sink_threshold_filters_records() {
        let registry = Registry::new();
        let buffer = SharedBuffer::default();

        let mut config = StreamSinkConfig::new();
        config.logger = Some("errors_only".to_string());
        config.target = StreamTarget::Writer(Box::new(buffer.clone()));
        config.sink_level = Level::Error;
        config.format = LineFormat::Template("{message}".to_string());
        attach_stream_sink(&registry, config).unwrap();

        let logger = registry.logger(Some("errors_only"));
        logger.handle(&LogRecord::new(Level::Info, "t").with_message("quiet"));
        logger.handle(&LogRecord::new(Level::Error, "t").with_message("loud"));

        assert_eq!(buffer.contents(), "loud\n");
    }
}
