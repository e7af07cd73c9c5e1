use crate::database::connection::{Connection, Cursor};
use crate::database::mapping::FieldMapping;
use crate::database::value::translate_row;
use crate::error::{Result, SinkError};
use crate::record::{Level, LogRecord};
use crate::registry::Registry;
use crate::sink::{Sink, SinkKind};

/// Build the INSERT statement for a table and column list, one positional
/// `?` placeholder per column.
pub fn insert_statement(table: &str, columns: &[&str]) -> String {
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table,
        columns.join(", "),
        placeholders
    )
}

/// Sink that writes each record as one row of a database table.
///
/// The sink owns the connection it was given and the cursor it opened on
/// it; both are released by `close`. One statement is executed and
/// committed per record — no batching, no retry.
pub struct DatabaseSink {
    connection: Box<dyn Connection>,
    cursor: Option<Box<dyn Cursor>>,
    table: String,
    mapping: FieldMapping,
    level: Level,
}

impl DatabaseSink {
    /// Open a cursor on `connection` and store the configuration. `None`
    /// for `mapping` selects the default nine-column mapping.
    ///
    /// **Errors**
    /// - [`SinkError::Database`] when the connection cannot produce a
    ///   cursor.
    pub fn new(
        mut connection: Box<dyn Connection>,
        table: impl Into<String>,
        mapping: Option<FieldMapping>,
    ) -> Result<Self> {
        let cursor = connection
            .cursor()
            .map_err(|e| SinkError::database(e.to_string()))?;
        Ok(Self {
            connection,
            cursor: Some(cursor),
            table: table.into(),
            mapping: mapping.unwrap_or_default(),
            level: Level::Trace,
        })
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }
}

impl Sink for DatabaseSink {
    /// Translate the record and execute one committed INSERT.
    ///
    /// The statement text is regenerated per record; the column list is
    /// fixed by the mapping, parameters are bound positionally in mapping
    /// order. Failures surface as `Err` for the dispatcher to report —
    /// nothing here reaches the host's logging caller.
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let cursor = self.cursor.as_mut().ok_or(SinkError::Closed)?;

        let columns: Vec<&str> = self.mapping.columns().collect();
        let statement = insert_statement(&self.table, &columns);
        let params = translate_row(record, &self.mapping);

        cursor
            .execute(&statement, &params)
            .map_err(|e| SinkError::database(e.to_string()))?;
        cursor
            .commit()
            .map_err(|e| SinkError::database(e.to_string()))?;
        Ok(())
    }

    fn level(&self) -> Level {
        self.level
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Database
    }

    /// Close the cursor, then the connection. Errors propagate to the
    /// caller — teardown failures are not swallowed like emit failures.
    fn close(&mut self) -> Result<()> {
        if let Some(mut cursor) = self.cursor.take() {
            cursor
                .close()
                .map_err(|e| SinkError::database(e.to_string()))?;
        }
        self.connection
            .close()
            .map_err(|e| SinkError::database(e.to_string()))?;
        Ok(())
    }
}

/// Attach a database sink to the configured logger.
///
/// **Parameters**
/// - `registry`: logger registry to attach into.
/// - `connection`: SQL connection the sink takes ownership of.
/// - `table`: destination table name.
/// - `mapping`: column mapping; `None` selects the default.
/// - `logger`: logger name; `None` means the root logger.
/// - `logger_level`: threshold applied to the logger itself when given.
/// - `sink_level`: threshold of the sink.
///
/// Unlike the file and stream helpers there is no duplicate suppression:
/// every call attaches a fresh sink.
pub fn attach_database_sink(
    registry: &Registry,
    connection: Box<dyn Connection>,
    table: &str,
    mapping: Option<FieldMapping>,
    logger: Option<&str>,
    logger_level: Option<Level>,
    sink_level: Level,
) -> Result<()> {
    let log = registry.logger(logger);
    if let Some(level) = logger_level {
        log.set_level(level);
    }

    let sink = DatabaseSink::new(connection, table, mapping)?.with_level(sink_level);
    log.attach(Box::new(sink));
    Ok(())
}
