//! Command-line configuration.
//!
//! # Responsibility
//! - Parse the launcher flags (including the legacy single-dash `-port`).
//! - Turn them into a validated [`ServerConfig`].
//!
//! # Invariants
//! - The server only ever binds to the loopback interface.

use clap::Parser;
use std::ffi::OsString;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 5_000;

/// Flags accepted by the `memlite` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "memlite",
    version,
    about = "HTTP interface to a single in-memory SQLite database"
)]
pub struct ServerArgs {
    /// Port number the server should listen on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long)]
    pub log_dir: Option<String>,

    /// How long in-flight requests may run after shutdown is requested.
    #[arg(long, default_value_t = DEFAULT_SHUTDOWN_GRACE_MS)]
    pub shutdown_grace_ms: u64,
}

impl ServerArgs {
    /// Parses process arguments, accepting `-port` as an alias of `--port`.
    pub fn parse_process_args() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }
}

/// Rewrites the single-dash `-port` form into clap's `--port`.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str() {
            Some("-port") => OsString::from("--port"),
            Some(other) if other.starts_with("-port=") => OsString::from(format!("-{other}")),
            _ => arg,
        })
        .collect()
}

/// Resolved runtime settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub shutdown_grace: Duration,
}

impl ServerConfig {
    /// Builds settings from parsed flags, filling build-mode defaults.
    pub fn from_args(args: ServerArgs) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, args.port)),
            log_level: args
                .log_level
                .unwrap_or_else(|| memlite_core::default_log_level().to_string()),
            log_dir: args.log_dir,
            shutdown_grace: Duration::from_millis(args.shutdown_grace_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_legacy_flags, ServerArgs, ServerConfig, DEFAULT_PORT};
    use clap::Parser;
    use std::net::{Ipv4Addr, SocketAddr};
    use std::time::Duration;

    fn parse(args: &[&str]) -> ServerArgs {
        ServerArgs::try_parse_from(normalize_legacy_flags(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_bind_loopback_on_8000() {
        let config = ServerConfig::from_args(parse(&["memlite"]));
        assert_eq!(
            config.addr,
            SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT))
        );
        assert_eq!(config.log_dir, None);
        assert_eq!(config.shutdown_grace, Duration::from_millis(5_000));
        assert_eq!(config.log_level, memlite_core::default_log_level());
    }

    #[test]
    fn legacy_single_dash_port_is_accepted() {
        assert_eq!(parse(&["memlite", "-port", "9123"]).port, 9123);
        assert_eq!(parse(&["memlite", "-port=9124"]).port, 9124);
        assert_eq!(parse(&["memlite", "--port", "9125"]).port, 9125);
    }

    #[test]
    fn optional_flags_are_carried_into_config() {
        let config = ServerConfig::from_args(parse(&[
            "memlite",
            "--log-level",
            "warn",
            "--log-dir",
            "/tmp/memlite-logs",
            "--shutdown-grace-ms",
            "250",
        ]));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/tmp/memlite-logs"));
        assert_eq!(config.shutdown_grace, Duration::from_millis(250));
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let result =
            ServerArgs::try_parse_from(normalize_legacy_flags(["memlite", "-port", "abc"]));
        assert!(result.is_err());
    }
}
