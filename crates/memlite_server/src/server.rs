//! Server lifecycle: listen, serve, drain, stop.
//!
//! # Invariants
//! - After shutdown is requested no new connections are accepted.
//! - In-flight requests get at most the configured grace period; after that
//!   the serve future is dropped and the database is not closed first.

use crate::api::{build_router, AppState};
use crate::shutdown::ShutdownController;
use log::{info, warn};
use memlite_core::SqliteSession;
use std::future::IntoFuture;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Serves the API on `listener` until shutdown is requested and drained.
pub async fn serve(
    listener: TcpListener,
    session: Arc<SqliteSession>,
    shutdown: ShutdownController,
    grace: Duration,
) -> io::Result<()> {
    let local_addr = listener.local_addr()?;
    let router = build_router(AppState::new(session, shutdown.clone()));
    info!("event=server_listen module=server status=ok addr={local_addr}");

    let signal = shutdown.clone();
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move { signal.requested().await })
        .into_future();
    tokio::pin!(server);

    let grace_expired = async {
        shutdown.requested().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = &mut server => {
            info!("event=server_stop module=server status=ok mode=graceful");
            result
        }
        () = grace_expired => {
            warn!(
                "event=server_stop module=server status=ok mode=forced grace_ms={}",
                grace.as_millis()
            );
            Ok(())
        }
    }
}
