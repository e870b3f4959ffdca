// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("watch directory {path} does not exist")]
    WatchDirectoryMissing { path: PathBuf },
    #[error("profile '{0}' is already installed")]
    AlreadyInstalled(String),
    #[error("profile '{0}' is not installed")]
    NotInstalled(String),
    #[error("watcher error: {0}")]
    Watch(#[from] fb_watch::WatcherError),
}
