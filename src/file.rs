use crate::error::Result;
use crate::format::LineFormat;
use crate::record::{Level, LogRecord};
use crate::registry::Registry;
use crate::sink::{Sink, SinkKind};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// How [`attach_file_sink`] opens the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Append to the file, creating it if missing.
    Append,
    /// Start the file over, creating it if missing.
    Truncate,
}

/// Configuration for [`attach_file_sink`].
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    pub path: PathBuf,
    /// Logger to attach to; `None` means the root logger.
    pub logger: Option<String>,
    pub mode: OpenMode,
    /// Threshold applied to the logger itself; `None` leaves it untouched.
    pub logger_level: Option<Level>,
    /// Threshold of the sink.
    pub sink_level: Level,
    pub format: LineFormat,
}

impl FileSinkConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logger: None,
            mode: OpenMode::Append,
            logger_level: Some(Level::Trace),
            sink_level: Level::Trace,
            format: LineFormat::default(),
        }
    }
}

/// Sink that writes one formatted line per record to a file.
///
/// Writes are unbuffered; every record reaches the file before `emit`
/// returns.
pub struct FileSink {
    path: PathBuf,
    file: File,
    level: Level,
    format: LineFormat,
}

impl FileSink {
    pub fn open(config: &FileSinkConfig) -> Result<Self> {
        let path = resolve_path(&config.path);
        let file = match config.mode {
            OpenMode::Append => OpenOptions::new().create(true).append(true).open(&path)?,
            OpenMode::Truncate => OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)?,
        };
        Ok(Self {
            path,
            file,
            level: config.sink_level,
            format: config.format.clone(),
        })
    }

    /// The resolved path this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.format.render(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }

    fn level(&self) -> Level {
        self.level
    }

    fn kind(&self) -> SinkKind {
        SinkKind::File(self.path.clone())
    }

    fn close(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

/// Attach a file sink to the configured logger.
///
/// Resolves (or creates) the logger, applies `logger_level` when given, and
/// scans the already-attached sinks: when a file sink targeting the
/// identical resolved path exists the call returns without modification.
/// There is no removal or replacement operation.
///
/// Open errors propagate — a file that cannot be created fails setup, not
/// emission.
pub fn attach_file_sink(registry: &Registry, config: FileSinkConfig) -> Result<()> {
    let logger = registry.logger(config.logger.as_deref());
    if let Some(level) = config.logger_level {
        logger.set_level(level);
    }

    let resolved = resolve_path(&config.path);
    if logger.is_attached(&SinkKind::File(resolved)) {
        return Ok(());
    }

    let sink = FileSink::open(&config)?;
    logger.attach(Box::new(sink));
    Ok(())
}

/// Absolutize without touching the filesystem, so the de-duplication key is
/// stable whether or not the file exists yet.
fn resolve_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LogRecord;

    #[test]
    fn attach_is_idempotent_per_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let registry = Registry::new();

        let mut config = FileSinkConfig::new(&path);
        config.logger = Some("files".to_string());
        attach_file_sink(&registry, config.clone()).unwrap();
        attach_file_sink(&registry, config).unwrap();

        assert_eq!(registry.logger(Some("files")).sink_count(), 1);
    }

    #[test]
    fn different_paths_attach_separately() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();

        let mut a = FileSinkConfig::new(dir.path().join("a.log"));
        a.logger = Some("files".to_string());
        let mut b = FileSinkConfig::new(dir.path().join("b.log"));
        b.logger = Some("files".to_string());
        attach_file_sink(&registry, a).unwrap();
        attach_file_sink(&registry, b).unwrap();

        assert_eq!(registry.logger(Some("files")).sink_count(), 2);
    }

    #[test]
    fn emitted_lines_land_in_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let registry = Registry::new();

        let mut config = FileSinkConfig::new(&path);
        config.logger = Some("out".to_string());
        config.format = LineFormat::Template("{level_name} {message}".to_string());
        attach_file_sink(&registry, config).unwrap();

        let logger = registry.logger(Some("out"));
        logger.handle(&LogRecord::new(Level::Info, "t").with_message("first"));
        logger.handle(&LogRecord::new(Level::Error, "t").with_message("second"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "INFO first\nERROR second\n");
    }

    #[test]
    fn truncate_mode_starts_the_file_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trunc.log");
        std::fs::write(&path, "stale\n").unwrap();

        let mut config = FileSinkConfig::new(&path);
        config.mode = OpenMode::Truncate;
        config.format = LineFormat::Template("{message}".to_string());
        let mut sink = FileSink::open(&config).unwrap();
        sink.emit(&LogRecord::new(Level::Info, "t").with_message("fresh"))
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn open_failure_propagates_at_setup() {
        let dir = tempfile::tempdir().unwrap();
        let missing_parent = dir.path().join("no_such_dir").join("x.log");
        let registry = Registry::new();
        let result = attach_file_sink(&registry, FileSinkConfig::new(missing_parent));
        assert!(result.is_err());
        assert_eq!(registry.logger(None).sink_count(), 0);
    }
}
