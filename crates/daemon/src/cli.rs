// SPDX-License-Identifier: MIT

//! Daemon CLI surface (spec §6 "ADDED CLI surface of the daemon
//! itself"): `filebridged [--config PATH] [--foreground]`.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "filebridged", about = "FileBridge Monitor daemon")]
pub struct Cli {
    /// Overrides the default config path resolution.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also log to stderr in addition to the rolling log file.
    #[arg(long)]
    pub foreground: bool,
}
