use thiserror::Error;

/// Error type shared by sink construction, emission and teardown.
#[derive(Debug, Error)]
pub enum SinkError {
    /// A column mapping names a field the record model does not expose.
    /// Raised at sink construction, never per record.
    #[error("invalid column mapping: {0}")]
    InvalidMapping(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failure reported by the database connection collaborator.
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// The sink was closed and can no longer emit.
    #[error("sink is closed")]
    Closed,
}

impl SinkError {
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

/// Result type alias for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;
