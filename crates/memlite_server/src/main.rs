//! `memlite` server entry point.
//!
//! # Responsibility
//! - Parse flags, start logging and run the HTTP server on loopback.
//! - Exit the process once the server has stopped, without waiting on
//!   outstanding database work.

use log::{error, info};
use memlite_core::SqliteSession;
use memlite_server::config::{ServerArgs, ServerConfig};
use memlite_server::shutdown::{forward_os_signals, ShutdownController};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let config = ServerConfig::from_args(ServerArgs::parse_process_args());

    if let Err(err) = memlite_core::init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("memlite: {err}");
        return ExitCode::from(2);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("event=runtime_init module=server status=error error={err}");
            memlite_core::flush_logging();
            return ExitCode::FAILURE;
        }
    };

    let code = match runtime.block_on(run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_run module=server status=error error={err}");
            ExitCode::FAILURE
        }
    };

    // A query may still occupy a blocking thread; do not wait for it.
    runtime.shutdown_background();
    memlite_core::flush_logging();
    code
}

async fn run(config: ServerConfig) -> std::io::Result<()> {
    info!(
        "event=server_start module=server status=start addr={} core_version={}",
        config.addr,
        memlite_core::core_version()
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    let session = Arc::new(SqliteSession::new());
    let shutdown = ShutdownController::new();
    tokio::spawn(forward_os_signals(shutdown.clone()));

    memlite_server::serve(listener, session, shutdown, config.shutdown_grace).await
}
