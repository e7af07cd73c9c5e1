//! Database sink: column mapping, row translation, statement building and
//! the abstract connection contract, plus the embedded SQLite backend when
//! the `sqlite` feature is enabled.

pub mod connection;
pub mod mapping;
pub mod schema;
pub mod sink;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use connection::{BoxError, Connection, Cursor};
pub use mapping::{FieldMapping, LOG_TABLE_MAP};
pub use schema::{log_table_definition, LOG_TABLE_DEFINITION};
pub use sink::{attach_database_sink, insert_statement, DatabaseSink};
pub use value::{translate_field, translate_row, SqlValue};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnection;
