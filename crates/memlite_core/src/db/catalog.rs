//! Schema catalog and storage metadata queries.

use super::DbResult;
use rusqlite::Connection;

/// Lists user and system table names in catalog order.
///
/// Order is whatever `sqlite_master` yields; callers must not rely on sorting.
pub fn list_tables(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table';")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Returns the database footprint in bytes as `page_count * page_size`.
pub fn storage_size_bytes(conn: &Connection) -> DbResult<i64> {
    let page_count: i64 = conn.query_row("PRAGMA page_count;", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size;", [], |row| row.get(0))?;
    Ok(page_count * page_size)
}
