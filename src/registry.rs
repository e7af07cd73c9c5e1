use crate::error::Result;
use crate::record::{Level, LogRecord};
use crate::sink::{Sink, SinkKind};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Explicit registry of named loggers.
///
/// One logger exists per name for the registry's lifetime; the root logger
/// (empty name) is created up front. The registry is meant to be owned by
/// the application's composition root and shared via `Arc` — there is no
/// hidden process-wide instance.
///
/// Locking here only guards the logger table and each logger's sink list so
/// the registry can be shared across threads; emission itself stays
/// synchronous on the calling thread.
pub struct Registry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    pub fn new() -> Self {
        let mut loggers = HashMap::new();
        loggers.insert(String::new(), Arc::new(Logger::new(String::new())));
        Self {
            loggers: Mutex::new(loggers),
        }
    }

    /// Look up a logger by name, creating it on first use. `None` resolves
    /// the root logger.
    pub fn logger(&self, name: Option<&str>) -> Arc<Logger> {
        let key = name.unwrap_or("");
        let mut loggers = lock(&self.loggers);
        Arc::clone(
            loggers
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Logger::new(key.to_string()))),
        )
    }

    /// Route a record to the logger it is addressed to, falling back to the
    /// root logger when no logger of that name was ever registered.
    ///
    /// The record is dropped when it falls below the resolved logger's
    /// threshold. Sink failures never propagate out of this call.
    pub fn dispatch(&self, record: &LogRecord) {
        let logger = {
            let loggers = lock(&self.loggers);
            record
                .logger
                .as_deref()
                .and_then(|name| loggers.get(name).cloned())
                .or_else(|| loggers.get("").cloned())
        };

        if let Some(logger) = logger {
            if record.level >= logger.level() {
                logger.handle(record);
            }
        }
    }

    /// Close every sink attached to every logger. All sinks are attempted;
    /// the first error encountered is returned.
    pub fn shutdown(&self) -> Result<()> {
        let loggers: Vec<Arc<Logger>> = lock(&self.loggers).values().cloned().collect();
        let mut result = Ok(());
        for logger in loggers {
            let closed = logger.close();
            if result.is_ok() {
                result = closed;
            }
        }
        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// A named logger: a severity threshold plus the sinks attached to it.
pub struct Logger {
    name: String,
    level: Mutex<Level>,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
}

impl Logger {
    fn new(name: String) -> Self {
        Self {
            name,
            level: Mutex::new(Level::Trace),
            sinks: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        *lock(&self.level)
    }

    pub fn set_level(&self, level: Level) {
        *lock(&self.level) = level;
    }

    pub fn attach(&self, sink: Box<dyn Sink>) {
        lock(&self.sinks).push(sink);
    }

    /// Whether a sink reporting the given kind is already attached.
    pub fn is_attached(&self, kind: &SinkKind) -> bool {
        lock(&self.sinks).iter().any(|s| s.kind() == *kind)
    }

    pub fn sink_count(&self) -> usize {
        lock(&self.sinks).len()
    }

    /// Fan a record out to every attached sink at or below its severity.
    ///
    /// This is the boundary where emit failures stop: each failing sink gets
    /// a diagnostic on standard error and the record is dropped for that
    /// sink; the call itself always returns.
    pub fn handle(&self, record: &LogRecord) {
        let mut sinks = lock(&self.sinks);
        for sink in sinks.iter_mut() {
            if record.level < sink.level() {
                continue;
            }
            if let Err(err) = sink.emit(record) {
                let name = if self.name.is_empty() { "root" } else { self.name.as_str() };
                eprintln!("log sink failure on logger '{}': {}", name, err);
            }
        }
    }

    /// Close all attached sinks. All are attempted; the first error is
    /// returned.
    pub fn close(&self) -> Result<()> {
        let mut sinks = lock(&self.sinks);
        let mut result = Ok(());
        for sink in sinks.iter_mut() {
            let closed = sink.close();
            if result.is_ok() {
                result = closed;
            }
        }
        result
    }
}
