//! Core library for memlite.
//! Owns the in-memory SQLite session, its value model and logging bootstrap.

pub mod db;
pub mod logging;
pub mod model;
pub mod session;

pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::status::StatusReport;
pub use model::value::{BindingError, SqlValue};
pub use session::{
    ConnectionOpener, QueryRows, SessionError, SessionResult, SqliteSession,
    NOT_CONNECTED_MESSAGE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
