// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon binary.

use std::path::PathBuf;

/// Resolve the config file path: `FILEBRIDGE_CONFIG` env var, else the
/// fixed system default.
pub fn default_config_path() -> PathBuf {
    std::env::var("FILEBRIDGE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/etc/filebridge-monitor/config.json"))
}

/// Resolve the control socket path: `FILEBRIDGE_SOCKET` env var, else
/// the fixed system default.
pub fn control_socket_path() -> PathBuf {
    std::env::var("FILEBRIDGE_SOCKET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/run/filebridge-monitor/control.sock"))
}

/// Resolve the daemon's own diagnostic log file path (spec §6
/// "ADDED Logging configuration"), distinct from the product log sink
/// directory configured in the loaded document.
pub fn daemon_log_path(log_directory: &std::path::Path) -> PathBuf {
    log_directory.join("filebridge-daemon.log")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
