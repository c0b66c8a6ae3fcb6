//! Shutdown signalling for the HTTP server.
//!
//! # Responsibility
//! - Carry "shutdown requested" from the terminate endpoint and OS signals
//!   to the server's graceful-shutdown hook.
//!
//! # Invariants
//! - Requesting shutdown is idempotent and never blocks.

use log::info;
use tokio_util::sync::CancellationToken;

/// Cloneable handle shared by handlers and the server loop.
#[derive(Debug, Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown; `source` names the trigger for logging.
    pub fn request(&self, source: &str) {
        if !self.token.is_cancelled() {
            info!("event=shutdown_requested module=server source={source}");
        }
        self.token.cancel();
    }

    pub fn is_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once shutdown has been requested.
    pub async fn requested(&self) {
        self.token.cancelled().await;
    }
}

/// Requests shutdown on Ctrl+C or SIGTERM.
pub async fn forward_os_signals(shutdown: ShutdownController) {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => shutdown.request("ctrl_c"),
        _ = terminate => shutdown.request("sigterm"),
        _ = shutdown.requested() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::ShutdownController;
    use std::time::Duration;

    #[tokio::test]
    async fn request_wakes_all_clones() {
        let shutdown = ShutdownController::new();
        let waiter = shutdown.clone();
        let task = tokio::spawn(async move { waiter.requested().await });

        assert!(!shutdown.is_requested());
        shutdown.request("test");
        shutdown.request("test");

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(shutdown.is_requested());
    }
}
