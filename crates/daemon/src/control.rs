// SPDX-License-Identifier: MIT

//! Manual-scan control surface (spec §4.I): a Unix domain socket
//! speaking a line-oriented text protocol, `SCAN <profile-name>\n` ->
//! `OK <count>\n` or `ERR <message>\n`. This is the minimal concrete
//! surface satisfying the manual-scan API from §6 without the web UI
//! or DI wiring that spec §1 explicitly puts out of scope.

use fb_core::Clock;
use fb_engine::ConfigManager;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, warn};

/// Bind the control socket, clearing any stale socket file left behind
/// by an unclean previous shutdown.
pub fn bind(path: &Path) -> std::io::Result<UnixListener> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = std::fs::remove_file(path);
    UnixListener::bind(path)
}

pub struct ControlServer<C: Clock> {
    socket: UnixListener,
    manager: Arc<ConfigManager<C>>,
}

impl<C: Clock + 'static> ControlServer<C> {
    pub fn new(socket: UnixListener, manager: Arc<ConfigManager<C>>) -> Self {
        Self { socket, manager }
    }

    /// Accept connections until the socket itself errors out. Each
    /// connection is handled on its own spawned task so one slow or
    /// stuck client cannot block the others.
    pub async fn run(self) {
        loop {
            match self.socket.accept().await {
                Ok((stream, _)) => {
                    let manager = Arc::clone(&self.manager);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &manager).await {
                            debug!(error = %e, "control connection closed with error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "control socket accept error");
                }
            }
        }
    }
}

async fn handle_connection<C: Clock>(
    stream: UnixStream,
    manager: &ConfigManager<C>,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let response = match parse_request(&line) {
        Some(Request::Scan(name)) => match manager.manual_scan(&name).await {
            Ok(count) => format!("OK {count}\n"),
            Err(e) => format!("ERR {e}\n"),
        },
        None => "ERR malformed request\n".to_string(),
    };

    writer.write_all(response.as_bytes()).await?;
    writer.flush().await
}

enum Request {
    Scan(String),
}

fn parse_request(line: &str) -> Option<Request> {
    let line = line.trim_end_matches(['\n', '\r']);
    let (cmd, rest) = line.split_once(' ')?;
    if cmd == "SCAN" && !rest.is_empty() {
        Some(Request::Scan(rest.to_string()))
    } else {
        None
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
