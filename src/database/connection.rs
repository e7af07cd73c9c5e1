use crate::database::value::SqlValue;
use std::error::Error;

/// Error currency of the connection collaborators.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Minimal contract of a generic SQL client, as the database sink needs it:
/// cursor acquisition and teardown. Statement execution lives on the
/// [`Cursor`].
///
/// The sink takes exclusive ownership of the connection it is given and
/// releases it on close.
pub trait Connection: Send {
    /// Open a cursor for statement execution.
    fn cursor(&mut self) -> Result<Box<dyn Cursor>, BoxError>;

    /// Release the connection. Called once, after every cursor is closed.
    fn close(&mut self) -> Result<(), BoxError>;
}

/// Statement execution handle obtained from a [`Connection`].
pub trait Cursor: Send {
    /// Execute a statement with positionally bound parameters, one
    /// [`SqlValue`] per `?` placeholder, in order.
    fn execute(&mut self, statement: &str, params: &[SqlValue]) -> Result<(), BoxError>;

    /// Make the effects of prior executes durable.
    fn commit(&mut self) -> Result<(), BoxError>;

    fn close(&mut self) -> Result<(), BoxError>;
}
