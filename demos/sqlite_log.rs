use std::sync::Arc;

use tracing::{error, info, warn};

use tracing_sinks::database::{attach_database_sink, log_table_definition, SqliteConnection};
use tracing_sinks::env::{env_or, LOG_SINK_SQLITE_PATH_ENV, LOG_SINK_TABLE_ENV};
use tracing_sinks::init::init;
use tracing_sinks::record::Level;
use tracing_sinks::registry::Registry;

/// Wire a SQLite-backed database sink into the root logger and emit a few
/// events through `tracing`.
///
/// The reporting table is created up front with the crate's default
/// ten-column definition, so the default nine-column mapping fits it
/// as-is.
fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // 1) Target database and table, overridable via the environment.
    let db_path = env_or(LOG_SINK_SQLITE_PATH_ENV, "demo_logs.db");
    let table = env_or(LOG_SINK_TABLE_ENV, "app_logs");

    // 2) Open the connection and make sure the table exists. SQLite has no
    //    IDENTITY column, so the demo uses its own DDL; the stock
    //    definition is printed for reference.
    println!("reference DDL:\n{}", log_table_definition(&table, "pk_app_logs"));
    let conn = SqliteConnection::open(&db_path)?;
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            log_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            date       TEXT    NOT NULL,
            logger     TEXT,
            module     TEXT,
            func_name  TEXT,
            line       INTEGER,
            level      INTEGER NOT NULL,
            level_name TEXT    NOT NULL,
            message    TEXT,
            traceback  TEXT
        );"
    ))?;

    // 3) Attach the sink to the root logger and install the layer.
    let registry = Arc::new(Registry::new());
    attach_database_sink(
        &registry,
        Box::new(conn),
        &table,
        None,
        None,
        Some(Level::Info),
        Level::Info,
    )?;
    init(Arc::clone(&registry));

    // 4) Emit; everything at info and above lands in the table.
    info!("service started");
    warn!(disk_free_mb = 512, "disk space low");
    error!(order_id = 123, "order failed");

    registry.shutdown()?;
    println!("records written to {db_path} table {table}");
    Ok(())
}
