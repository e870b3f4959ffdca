// SPDX-License-Identifier: MIT

//! Tracing setup for the daemon's own diagnostic stream (spec §6
//! "ADDED Logging configuration"), independent of the `fb-storage`
//! product log sink.

use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber: a rolling file layer
/// always, plus a stderr layer when `foreground` is set. Returns the
/// non-blocking writer's guard, which must be kept alive for the
/// process lifetime or buffered lines are dropped on exit.
pub fn setup_logging(
    log_path: &Path,
    foreground: bool,
) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    let parent = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let file_appender = tracing_appender::rolling::never(
        parent,
        log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("filebridge-daemon.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false));

    if foreground {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    } else {
        registry.init();
    }

    Ok(guard)
}
