// SPDX-License-Identifier: MIT

//! Launcher (component E, spec §4.E): spawns the configured executable
//! per admitted file, bounds concurrency with a counting semaphore, and
//! reports the outcome through the log sink.

use crate::running::RunningProcessSet;
use chrono::Utc;
use fb_core::{FileEvent, LogKind, WatchProfile};
use fb_storage::LogAppender;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::{oneshot, Semaphore};

pub struct Launcher {
    semaphore: Arc<Semaphore>,
    running: Arc<RunningProcessSet>,
    tasks: parking_lot::Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl Launcher {
    /// `max_concurrent` of 0 means effectively unbounded (spec §3,
    /// §4.E), modeled as the semaphore's maximum permit count.
    pub fn new(max_concurrent: usize) -> Self {
        let capacity = if max_concurrent == 0 {
            Semaphore::MAX_PERMITS
        } else {
            max_concurrent
        };
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            running: Arc::new(RunningProcessSet::new()),
            tasks: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Spawn the configured executable for `event`. Returns once the
    /// spawn attempt has been made (success or failure); does not wait
    /// for the child to exit. The permit acquired here is released
    /// exactly once, by the background task that awaits the child.
    pub async fn launch(&self, profile: &WatchProfile, event: &FileEvent, log: Arc<dyn LogAppender>) {
        if profile.executable_path.as_os_str().is_empty() || !profile.executable_path.is_file() {
            let _ = log
                .append(
                    LogKind::ProcessError,
                    format!(
                        "executablePath '{}' does not resolve to an existing file",
                        profile.executable_path.display()
                    ),
                    None,
                )
                .await;
            return;
        }

        let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return, // semaphore never closes in practice
        };

        let args = build_arguments(profile, event);
        let cwd = profile
            .executable_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(std::path::Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok());

        let mut command = Command::new(&profile.executable_path);
        command.args(&args).stdout(Stdio::piped()).stderr(Stdio::piped());
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(error) => {
                let _ = log
                    .append(
                        LogKind::ProcessError,
                        format!("failed to spawn {}", profile.executable_path.display()),
                        Some(error.to_string()),
                    )
                    .await;
                return;
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let pid = child.id();
        let (kill_tx, mut kill_rx) = oneshot::channel();
        if let Some(pid) = pid {
            self.running.insert(pid, kill_tx, Utc::now());
        }

        let running = Arc::clone(&self.running);
        let profile_name = profile.name.clone();
        let executable = profile.executable_path.display().to_string();

        let task = tokio::spawn(async move {
            if let Some(stdout) = stdout {
                tokio::spawn(forward_lines(stdout, false));
            }
            if let Some(stderr) = stderr {
                tokio::spawn(forward_lines(stderr, true));
            }

            let status = tokio::select! {
                status = child.wait() => status,
                _ = &mut kill_rx => {
                    let _ = child.start_kill();
                    child.wait().await
                }
            };

            if let Some(pid) = pid {
                running.remove(pid);
            }
            drop(permit);

            match status {
                Ok(status) if status.success() => {
                    let _ = log
                        .append(
                            LogKind::ProcessLaunch,
                            format!("profile '{profile_name}' launched {executable}"),
                            None,
                        )
                        .await;
                }
                Ok(status) => {
                    let _ = log
                        .append(
                            LogKind::ProcessError,
                            format!("profile '{profile_name}' child exited with {status}"),
                            status.code().map(|code| code.to_string()),
                        )
                        .await;
                }
                Err(error) => {
                    let _ = log
                        .append(
                            LogKind::ProcessError,
                            format!("profile '{profile_name}' failed waiting on child"),
                            Some(error.to_string()),
                        )
                        .await;
                }
            }
        });

        self.tasks.lock().push(task);
    }

    /// Terminate every still-running child (signal + synchronous wait),
    /// then release resources. Never panics.
    pub async fn shutdown(&self) {
        self.running.signal_all();
        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            let _ = task.await;
        }
    }
}

async fn forward_lines(reader: impl tokio::io::AsyncRead + Unpin, is_stderr: bool) {
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if is_stderr {
                    tracing::error!(target: "filebridge::child", "{line}");
                } else {
                    tracing::debug!(target: "filebridge::child", "{line}");
                }
            }
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(%error, "error reading child output stream");
                break;
            }
        }
    }
}

/// Tokenize the argument template respecting double-quoted spans, then
/// expand `{FilePath}`/`{FolderPath}` within each token (spec §4.E).
fn build_arguments(profile: &WatchProfile, event: &FileEvent) -> Vec<String> {
    let file_path = event.file_path.display().to_string();
    let folder_path = event
        .file_path
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    tokenize(&profile.arguments)
        .into_iter()
        .map(|token| substitute(&token, &file_path, &folder_path))
        .collect()
}

/// Quotes toggle an in-quote flag and are stripped from the output;
/// unquoted whitespace splits tokens.
fn tokenize(template: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut has_content = false;

    for ch in template.chars() {
        match ch {
            '"' => {
                in_quote = !in_quote;
                has_content = true;
            }
            c if c.is_whitespace() && !in_quote => {
                if has_content {
                    tokens.push(std::mem::take(&mut current));
                    has_content = false;
                }
            }
            c => {
                current.push(c);
                has_content = true;
            }
        }
    }
    if has_content {
        tokens.push(current);
    }
    tokens
}

fn substitute(token: &str, file_path: &str, folder_path: &str) -> String {
    token.replace("{FilePath}", file_path).replace("{FolderPath}", folder_path)
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
