//! Process-level database session.
//!
//! # Responsibility
//! - Own the single optional in-memory connection.
//! - Expose connect/execute/status use cases with explicit error kinds.
//!
//! # Invariants
//! - At most one connection is ever stored; it is never replaced or reset.
//! - Every statement runs while holding the session lock.

use crate::model::value::BindingError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite_session;

pub use sqlite_session::{ConnectionOpener, QueryRows, SqliteSession};

/// Message returned when a query arrives before the database exists.
pub const NOT_CONNECTED_MESSAGE: &str =
    "In-memory SQLite database not created yet. Call /sqlite/connect_in_memory first.";

pub type SessionResult<T> = Result<T, SessionError>;

/// Error kinds surfaced by session operations.
#[derive(Debug)]
pub enum SessionError {
    /// The operation needs a connection and none has been created yet.
    NotConnected,
    /// A request parameter has no SQLite equivalent.
    Binding(BindingError),
    /// SQLite rejected the open, prepare, bind or step.
    Sqlite(rusqlite::Error),
}

impl SessionError {
    /// Returns `true` when the caller skipped the connect step.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NotConnected)
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => f.write_str(NOT_CONNECTED_MESSAGE),
            Self::Binding(err) => write!(f, "{err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotConnected => None,
            Self::Binding(err) => Some(err),
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<BindingError> for SessionError {
    fn from(value: BindingError) -> Self {
        Self::Binding(value)
    }
}

impl From<rusqlite::Error> for SessionError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
