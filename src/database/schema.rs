//! Reporting-table DDL for the default column mapping.

/// CREATE TABLE template matching [`LOG_TABLE_MAP`](crate::database::LOG_TABLE_MAP).
/// `{table_name}` and `{primary_key}` are the only substitution points.
pub const LOG_TABLE_DEFINITION: &str = "CREATE TABLE {table_name} (
      log_id      INT           NOT NULL IDENTITY
    , date        DATETIME      NOT NULL
    , logger      VARCHAR(100)      NULL
    , module      VARCHAR(100)  NOT NULL
    , func_name   VARCHAR(100)  NOT NULL
    , line        INT               NULL
    , level       INT           NOT NULL
    , level_name  VARCHAR(100)  NOT NULL
    , message     VARCHAR(400)      NULL
    , traceback   VARCHAR(4000)     NULL

    , CONSTRAINT {primary_key} PRIMARY KEY (log_id)
);";

/// Render the default log table definition. Purely textual; no I/O.
///
/// **Parameters**
/// - `table_name`: name of the table to create.
/// - `primary_key`: name of the primary-key constraint.
pub fn log_table_definition(table_name: &str, primary_key: &str) -> String {
    LOG_TABLE_DEFINITION
        .replace("{table_name}", table_name)
        .replace("{primary_key}", primary_key)
}
