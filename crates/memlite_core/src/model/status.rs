//! Database status snapshot.

use serde::{Deserialize, Serialize};

/// Connection and storage metadata reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Whether the in-memory database has been created.
    pub connected: bool,
    /// Table names in catalog order.
    pub tables: Vec<String>,
    /// Storage footprint in bytes (`page_count * page_size`).
    pub size: i64,
}

impl StatusReport {
    /// Report returned before any connection exists.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            tables: Vec::new(),
            size: 0,
        }
    }
}
