//! PiScan entry point.
//!
//! Turns the USB barcode scanners attached to this machine into a stream of
//! decoded scans, echoed to stdout.
//!
//! # Usage
//!
//! ```text
//! sudo piscan [OPTIONS]
//!
//! Options:
//!   --config <PATH>      JSON (or .toml) config file [env: PISCAN_CONFIG]
//!   --name <NAME>        Display name, overrides the config file
//!   --separator <KEY>    Key that ends a scan; repeat for several
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ ExecRestarter::capture()   -- snapshot argv/env for re-exec
//!  ├─ resolve_config()           -- file + CLI overrides
//!  ├─ build_runtime()            -- exit never waits on in-flight handlers
//!  ├─ require_root()             -- grabbing needs root
//!  ├─ discover_scanners()        -- /dev/input/event* filtered by vendor:product
//!  └─ ScanSession::listen()      -- multiplex → decode → dispatch, until Ctrl-C
//!                                   or a device is lost (→ re-exec)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use piscan::application::session::{ListenError, ScanSession, SessionEnd};
use piscan::infrastructure::console::{print_banner, print_device_report, scanned_line};
use piscan::infrastructure::discovery::discover_scanners;
use piscan::infrastructure::privilege::require_root;
use piscan::infrastructure::restart::ExecRestarter;
use piscan::infrastructure::runtime::{build_runtime, run_to_completion};
use piscan::infrastructure::storage::config::{resolve_config, ConfigSource, ScanConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Headless listener for USB barcode scanners.
#[derive(Debug, Parser)]
#[command(name = "piscan", about = "Decode USB barcode scanner input", version)]
struct Cli {
    /// Path to a config file.  Parsed as TOML if it ends in `.toml`,
    /// otherwise as JSON.
    #[arg(long, env = "PISCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Display name shown in the start-up banner.
    #[arg(long)]
    name: Option<String>,

    /// Key name whose release ends a scan (e.g. `enter`).  Repeatable;
    /// replaces the configured separators when given.
    #[arg(long = "separator", value_name = "KEY")]
    separators: Vec<String>,
}

impl Cli {
    fn config_source(&self) -> ConfigSource {
        match &self.config {
            Some(path) => ConfigSource::File(path.clone()),
            None => ConfigSource::default(),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Must run before anything can touch argv or the environment; a restart
    // replays exactly this snapshot.
    let restarter = ExecRestarter::capture().context("failed to capture process image")?;

    let cli = Cli::parse();
    let config = resolve_config(&cli.config_source()).with_overrides(cli.name, cli.separators);

    let runtime = build_runtime().context("failed to start the async runtime")?;
    // Returns without waiting for scan handlers still in flight.
    let end = run_to_completion(runtime, listen(config, restarter));

    match end {
        Ok(SessionEnd::Interrupted) => {
            println!("Exiting....");
            Ok(())
        }
        Ok(SessionEnd::SourcesClosed) => {
            info!("all scanners closed; exiting");
            Ok(())
        }
        Ok(SessionEnd::Restarted) => {
            anyhow::bail!("restart returned without replacing the process")
        }
        Err(e @ ListenError::NotRoot) => {
            println!("{e}");
            std::process::exit(1);
        }
        Err(e @ ListenError::NoDevices) => {
            error!("{e}");
            std::process::exit(1);
        }
        Err(e) => Err(e).context("listener stopped"),
    }
}

/// Checks privileges, finds the scanners and listens until Ctrl-C or a
/// device is lost.
async fn listen(config: ScanConfig, restarter: ExecRestarter) -> Result<SessionEnd, ListenError> {
    require_root()?;
    print_banner(&config);

    let devices = discover_scanners(&config.scanners);
    if !devices.is_empty() {
        print_device_report(&devices.device_infos());
    }

    let handler = Arc::new(|scan: &str| -> anyhow::Result<()> {
        println!("{}", scanned_line(scan));
        Ok(())
    });
    let mut session = ScanSession::new(config.decoder_config(), handler, Arc::new(restarter));
    session.listen(devices, shutdown_signal()).await
}

/// Resolves on Ctrl-C.  If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl+C signal: {e}");
        std::future::pending::<()>().await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_without_arguments_uses_default_config() {
        // Arrange: parse with no arguments
        let cli = Cli::parse_from(["piscan"]);

        // Assert
        assert!(cli.name.is_none());
        assert!(cli.separators.is_empty());
        if std::env::var_os("PISCAN_CONFIG").is_none() {
            assert_eq!(cli.config_source(), ConfigSource::default());
        }
    }

    #[test]
    fn test_cli_config_path_becomes_file_source() {
        let cli = Cli::parse_from(["piscan", "--config", "/etc/piscan.toml"]);
        assert_eq!(
            cli.config_source(),
            ConfigSource::File(PathBuf::from("/etc/piscan.toml"))
        );
    }

    #[test]
    fn test_cli_separator_is_repeatable() {
        let cli = Cli::parse_from(["piscan", "--separator", "enter", "--separator", "f12"]);
        assert_eq!(cli.separators, vec!["enter".to_string(), "f12".to_string()]);
    }

    #[test]
    fn test_cli_overrides_apply_to_resolved_config() {
        let cli = Cli::parse_from(["piscan", "--name", "Dock", "--separator", "tab"]);
        let config = resolve_config(&ConfigSource::default()).with_overrides(cli.name, cli.separators);
        assert_eq!(config.name, "Dock");
        assert_eq!(config.separators, vec!["tab".to_string()]);
    }
}
