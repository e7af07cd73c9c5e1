/// Environment variable names used by this crate for convenient
/// configuration of sinks from applications.
///
/// These are purely helpers; the core sink types remain decoupled from
/// environment access.

/// SQLite database file path, e.g. `/var/log/app/logs.db`.
pub const LOG_SINK_SQLITE_PATH_ENV: &str = "LOG_SINK_SQLITE_PATH";

/// Target table name for the database sink.
pub const LOG_SINK_TABLE_ENV: &str = "LOG_SINK_TABLE";

/// Log file path for the file sink.
pub const LOG_SINK_FILE_PATH_ENV: &str = "LOG_SINK_FILE_PATH";

/// Optional logger name the setup helpers attach to (default: root).
pub const LOG_SINK_LOGGER_ENV: &str = "LOG_SINK_LOGGER";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
