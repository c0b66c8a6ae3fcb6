//! HTTP front-end for the memlite in-memory SQLite session.

pub mod api;
pub mod config;
pub mod server;
pub mod shutdown;

pub use api::{build_router, AppState};
pub use config::{ServerArgs, ServerConfig};
pub use server::serve;
pub use shutdown::ShutdownController;
