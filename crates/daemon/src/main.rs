// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! filebridged: the process entry point. Loads the configuration
//! document, installs every valid profile into a [`ConfigManager`],
//! starts the retention sweep and the manual-scan control socket, and
//! runs until SIGTERM/SIGINT (spec §4.G-§4.I).

mod cli;
mod control;
mod env;
mod logging;

use clap::Parser;
use fb_core::{LogKind, SystemClock};
use fb_engine::ConfigManager;
use fb_storage::{LogAppender, LogSink};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    let config_path = cli.config.unwrap_or_else(env::default_config_path);

    let loaded = fb_config::load_from_path(&config_path)?;

    let log_dir = std::path::PathBuf::from(&loaded.log_sink.log_directory);
    let _log_guard = logging::setup_logging(&env::daemon_log_path(&log_dir), cli.foreground)?;

    info!(path = %config_path.display(), "loaded configuration");

    let sink = Arc::new(LogSink::new(
        log_dir.clone(),
        loaded.log_sink.max_logs_per_file,
        SystemClock,
    ));

    for failed in &loaded.errors {
        warn!(profile = %failed.name, error = %failed.error, "profile failed validation, skipping");
        let _ = sink
            .append(
                LogKind::ProcessError,
                format!("profile '{}' failed validation", failed.name),
                Some(failed.error.to_string()),
            )
            .await;
    }

    let manager = Arc::new(ConfigManager::new(sink.clone(), SystemClock));
    for profile in loaded.profiles {
        let name = profile.name.clone();
        if let Err(e) = manager.install(profile).await {
            error!(profile = %name, error = %e, "failed to install profile");
        } else {
            info!(profile = %name, "installed profile");
        }
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let retention_sink = Arc::clone(&sink);
    let retention_task = fb_storage::spawn_retention_loop(
        log_dir,
        loaded.log_sink.log_retention_days,
        SystemClock,
        Arc::new(move |date| retention_sink.evict_cache(date)),
        shutdown_rx,
    );

    let socket_path = env::control_socket_path();
    let listener = control::bind(&socket_path)?;
    info!(path = %socket_path.display(), "listening for manual-scan requests");
    let server = control::ControlServer::new(listener, Arc::clone(&manager));
    let control_task = tokio::spawn(server.run());

    wait_for_shutdown_signal().await;
    info!("shutdown signal received, draining profiles");

    control_task.abort();
    let _ = shutdown_tx.send(true);
    let _ = retention_task.await;

    for name in manager.list().await {
        if let Err(e) = manager.remove(&name).await {
            error!(profile = %name, error = %e, "error stopping profile");
        }
    }

    info!("daemon stopped");
    Ok(())
}

/// Waits for either SIGTERM or SIGINT (spec §4.I / Ctrl-C in
/// foreground mode).
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "failed to install SIGINT handler");
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = sigint.recv() => info!("received SIGINT"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
