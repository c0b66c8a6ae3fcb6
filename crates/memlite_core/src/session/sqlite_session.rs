//! SQLite-backed session holding the single in-memory connection.

use super::{SessionError, SessionResult};
use crate::db::{self, DbResult};
use crate::model::status::StatusReport;
use crate::model::value::SqlValue;
use log::{debug, info, warn};
use rusqlite::{params_from_iter, Batch, Connection};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Fully materialized result rows, one `Vec` per row in column order.
pub type QueryRows = Vec<Vec<SqlValue>>;

/// Factory used to create the connection on first `connect`.
pub type ConnectionOpener = Box<dyn Fn() -> DbResult<Connection> + Send + Sync>;

/// Owns the optional connection and serializes every access to it.
///
/// Shared between request handlers behind an `Arc`; each test builds its
/// own instance.
pub struct SqliteSession {
    conn: Mutex<Option<Connection>>,
    opener: ConnectionOpener,
}

impl Default for SqliteSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SqliteSession {
    /// Creates a disconnected session that opens in-memory databases.
    pub fn new() -> Self {
        Self::with_opener(Box::new(db::open_db_in_memory))
    }

    /// Creates a disconnected session with a custom connection factory.
    pub fn with_opener(opener: ConnectionOpener) -> Self {
        Self {
            conn: Mutex::new(None),
            opener,
        }
    }

    /// Returns whether the connection has been created.
    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    /// Fails with [`SessionError::NotConnected`] before the first `connect`.
    pub fn ensure_connected(&self) -> SessionResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(SessionError::NotConnected)
        }
    }

    /// Creates the in-memory database unless it already exists.
    ///
    /// # Contract
    /// - Idempotent: later calls keep the existing connection and its data.
    /// - On open failure the session stays disconnected so callers may retry.
    pub fn connect(&self) -> SessionResult<()> {
        let mut guard = self.lock();
        if guard.is_some() {
            debug!("event=db_open module=session status=reused mode=memory");
            return Ok(());
        }

        let conn = (self.opener)()?;
        *guard = Some(conn);
        Ok(())
    }

    /// Runs one parameterized statement and returns every produced row.
    ///
    /// Parameters bind positionally to `?` placeholders. Statements that
    /// produce no rows, and input holding no statement at all (empty or
    /// comment-only), return an empty list.
    ///
    /// # Errors
    /// - [`SessionError::NotConnected`] before the first `connect`.
    /// - [`SessionError::Sqlite`] with SQLite's own message on any prepare,
    ///   bind or step failure. The session stays usable afterwards.
    /// - [`SessionError::Sqlite`] when `sql` holds more than one statement;
    ///   none of them runs.
    pub fn execute(&self, sql: &str, params: &[SqlValue]) -> SessionResult<QueryRows> {
        let started_at = Instant::now();
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(SessionError::NotConnected)?;

        match run_statement(conn, sql, params) {
            Ok(rows) => {
                info!(
                    "event=query_execute module=session status=ok params={} rows={} duration_ms={}",
                    params.len(),
                    rows.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(rows)
            }
            Err(err) => {
                warn!(
                    "event=query_execute module=session status=error params={} duration_ms={} error_code={}",
                    params.len(),
                    started_at.elapsed().as_millis(),
                    error_code(&err)
                );
                Err(err.into())
            }
        }
    }

    /// Reports connection state, table names and storage size.
    ///
    /// Never creates the connection.
    pub fn status(&self) -> SessionResult<StatusReport> {
        let guard = self.lock();
        let Some(conn) = guard.as_ref() else {
            return Ok(StatusReport::disconnected());
        };

        Ok(StatusReport {
            connected: true,
            tables: db::list_tables(conn)?,
            size: db::storage_size_bytes(conn)?,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        // The slot only ever holds a fully opened connection, so a panic in
        // another holder cannot leave it half-initialized.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn run_statement(conn: &Connection, sql: &str, params: &[SqlValue]) -> DbResult<QueryRows> {
    let mut batch = Batch::new(conn, sql);
    let Some(mut stmt) = batch.next()? else {
        return Ok(Vec::new());
    };
    // Every trailing statement is prepared before the first one steps.
    if batch.next()?.is_some() {
        return Err(rusqlite::Error::MultipleStatement);
    }

    let column_count = stmt.column_count();
    let mut rows = stmt.query(params_from_iter(params.iter()))?;

    let mut results = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            values.push(SqlValue::from(row.get_ref(index)?));
        }
        results.push(values);
    }
    Ok(results)
}

fn error_code(err: &rusqlite::Error) -> String {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => format!("{:?}", failure.code),
        rusqlite::Error::InvalidParameterCount(..) => "InvalidParameterCount".to_string(),
        rusqlite::Error::MultipleStatement => "MultipleStatement".to_string(),
        _ => "Other".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSession;
    use crate::session::SessionError;

    #[test]
    fn new_session_is_disconnected() {
        let session = SqliteSession::new();
        assert!(!session.is_connected());
        assert!(matches!(
            session.ensure_connected(),
            Err(SessionError::NotConnected)
        ));
    }

    #[test]
    fn status_does_not_connect() {
        let session = SqliteSession::default();
        let report = session.status().unwrap();
        assert!(!report.connected);
        assert!(!session.is_connected());
    }
}
