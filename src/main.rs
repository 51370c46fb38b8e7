// Marquee - movie and actor catalog
//
// One binary, three ways to run:
// - default: REST server in the background, terminal front-end in front
//   (headless with MARQUEE_NO_TUI=1, waiting for Ctrl+C)
// - serve: REST server only
// - tui: terminal front-end only, talking to `api_base`

use anyhow::{Context, Result};
use marquee::cli::{self, RunMode};
use marquee::config::Config;
use marquee::logging::{self, LogBuffer};
use marquee::storage::Catalog;
use marquee::{server, startup, tui};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, --path)
    let Some(mode) = cli::handle_cli() else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env();
    let show_tui = match mode {
        RunMode::All => config.enable_tui,
        RunMode::Tui => true,
        RunMode::Serve => false,
    };

    // In TUI mode logs go to the in-memory buffer shown in the logs panel;
    // otherwise to stdout. The guard keeps the file writer flushing.
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config.logging, show_tui, &log_buffer);

    if show_tui {
        startup::log_startup(&config, mode);
    } else {
        startup::print_startup(&config, mode);
    }

    // Start the REST server unless only the front-end was asked for
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let mut server_handle = if mode == RunMode::Tui {
        None
    } else {
        Some(spawn_server(&config, shutdown_rx)?)
    };

    if show_tui {
        tui::run_tui(config, log_buffer).await?;
    } else if let Some(handle) = server_handle.as_mut() {
        tracing::info!("Running headless, press Ctrl+C to stop");
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl+C")?;
            }
            // The server stopping on its own (e.g. bind failure) ends the run
            finished = handle => {
                return finished.context("Server task failed")?;
            }
        }
    }

    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(());
    if let Some(handle) = server_handle {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Server error: {:#}", e),
            Err(e) => tracing::error!("Server task failed: {}", e),
        }
    }

    Ok(())
}

/// Open the catalog and serve it in the background
fn spawn_server(config: &Config, shutdown_rx: oneshot::Receiver<()>) -> Result<JoinHandle<Result<()>>> {
    let catalog = Catalog::open(&config.db_path)
        .with_context(|| format!("Failed to open catalog at {}", config.db_path.display()))?;

    Ok(tokio::spawn(server::start_server(
        catalog,
        config.server.clone(),
        config.bind_addr,
        None,
        shutdown_rx,
    )))
}
