//! SQLite connection bootstrap and catalog inspection.
//!
//! # Responsibility
//! - Open and configure the in-memory SQLite connection.
//! - Read schema catalog and storage metadata for status reporting.
//!
//! # Invariants
//! - Connections opened here are memory-only; nothing is written to disk.
//! - Catalog helpers are read-only.

mod catalog;
mod open;

pub use catalog::{list_tables, storage_size_bytes};
pub use open::open_db_in_memory;

pub type DbResult<T> = Result<T, rusqlite::Error>;
