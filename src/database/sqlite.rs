use crate::database::connection::{BoxError, Connection, Cursor};
use crate::database::value::SqlValue;
use rusqlite::types::{Null, ToSqlOutput};
use rusqlite::ToSql;
use std::path::Path;
use std::sync::{Arc, Mutex};

type Shared = Arc<Mutex<Option<rusqlite::Connection>>>;

fn lock(shared: &Shared) -> std::sync::MutexGuard<'_, Option<rusqlite::Connection>> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

/// [`Connection`] implementation backed by an embedded SQLite database.
///
/// SQLite runs in autocommit mode, so the cursor's `commit` is a no-op;
/// every execute is durable on return.
pub struct SqliteConnection {
    inner: Shared,
}

impl SqliteConnection {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BoxError> {
        let conn = rusqlite::Connection::open(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Some(conn))),
        })
    }

    pub fn open_in_memory() -> Result<Self, BoxError> {
        let conn = rusqlite::Connection::open_in_memory()?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Run one setup statement (e.g. CREATE TABLE) before the connection is
    /// handed to a sink.
    pub fn execute_batch(&self, sql: &str) -> Result<(), BoxError> {
        let guard = lock(&self.inner);
        let conn = guard.as_ref().ok_or("connection is closed")?;
        conn.execute_batch(sql)?;
        Ok(())
    }
}

impl Connection for SqliteConnection {
    fn cursor(&mut self) -> Result<Box<dyn Cursor>, BoxError> {
        Ok(Box::new(SqliteCursor {
            inner: Arc::clone(&self.inner),
        }))
    }

    fn close(&mut self) -> Result<(), BoxError> {
        let mut guard = lock(&self.inner);
        match guard.take() {
            Some(conn) => conn.close().map_err(|(_, err)| Box::new(err) as BoxError),
            None => Ok(()),
        }
    }
}

struct SqliteCursor {
    inner: Shared,
}

impl Cursor for SqliteCursor {
    fn execute(&mut self, statement: &str, params: &[SqlValue]) -> Result<(), BoxError> {
        let guard = lock(&self.inner);
        let conn = guard.as_ref().ok_or("connection is closed")?;
        conn.execute(statement, rusqlite::params_from_iter(params.iter()))?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), BoxError> {
        // Autocommit; nothing pending.
        Ok(())
    }

    fn close(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Null => Ok(ToSqlOutput::from(Null)),
            SqlValue::Int(v) => Ok(ToSqlOutput::from(*v)),
            SqlValue::Float(v) => Ok(ToSqlOutput::from(*v)),
            SqlValue::Text(v) => Ok(ToSqlOutput::from(v.as_str())),
            SqlValue::Timestamp(v) => v.to_sql(),
        }
    }
}
