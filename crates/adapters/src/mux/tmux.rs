// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tmux-backed multiplexer adapter.

use super::{MultiplexerAdapter, MuxError};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// tmux session size fixed by spec §4.A so agent TUIs render consistently
/// regardless of the attaching terminal.
const SESSION_COLS: &str = "200";
const SESSION_ROWS: &str = "50";

/// Coordination env vars stamped onto every worker session at creation so
/// the stop-event hook (running inside the agent's process tree) can read
/// them without inheriting from the bridge's process environment.
#[derive(Clone)]
struct SessionEnv {
    port: String,
    prefix: String,
    sessions_dir: String,
    bridge_url: Option<String>,
}

impl SessionEnv {
    fn as_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("PORT", self.port.clone()),
            ("TMUX_PREFIX", self.prefix.clone()),
            ("SESSIONS_DIR", self.sessions_dir.clone()),
        ];
        if let Some(ref url) = self.bridge_url {
            pairs.push(("BRIDGE_URL", url.clone()));
        }
        pairs
    }
}

#[derive(Clone)]
pub struct TmuxAdapter {
    prefix: String,
    env: SessionEnv,
}

impl TmuxAdapter {
    pub fn new(prefix: String, port: u16, sessions_dir: String, bridge_url: Option<String>) -> Self {
        Self {
            env: SessionEnv {
                port: port.to_string(),
                prefix: prefix.clone(),
                sessions_dir,
                bridge_url,
            },
            prefix,
        }
    }

    fn full_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

#[async_trait]
impl MultiplexerAdapter for TmuxAdapter {
    async fn list(&self) -> Result<Vec<String>, MuxError> {
        let output = Command::new("tmux")
            .args(["list-sessions", "-F", "#{session_name}"])
            .output()
            .await
            .map_err(|e| MuxError::CommandFailed(e.to_string()))?;

        // `list-sessions` exits non-zero when no tmux server is running at
        // all — that's an empty worker set, not an error (spec §4.A).
        if !output.status.success() {
            return Ok(Vec::new());
        }

        let names = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| line.strip_prefix(self.prefix.as_str()))
            .map(|short| short.to_string())
            .collect();
        Ok(names)
    }

    async fn exists(&self, name: &str) -> Result<bool, MuxError> {
        let output = Command::new("tmux")
            .args(["has-session", "-t", &self.full_name(name)])
            .output()
            .await
            .map_err(|e| MuxError::CommandFailed(e.to_string()))?;
        Ok(output.status.success())
    }

    async fn create(&self, name: &str, cwd: &Path, agent_cmd: &str) -> Result<(), MuxError> {
        if !cwd.exists() {
            return Err(MuxError::SpawnFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        let full = self.full_name(name);
        if self.exists(name).await? {
            return Err(MuxError::AlreadyExists(full));
        }

        let mut cmd = Command::new("tmux");
        cmd.arg("new-session")
            .arg("-d")
            .arg("-s")
            .arg(&full)
            .arg("-c")
            .arg(cwd)
            .arg("-x")
            .arg(SESSION_COLS)
            .arg("-y")
            .arg(SESSION_ROWS);

        for (key, value) in self.env.as_pairs() {
            cmd.arg("-e").arg(format!("{key}={value}"));
        }

        cmd.arg(agent_cmd);

        let output = cmd
            .output()
            .await
            .map_err(|e| MuxError::SpawnFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session = %full, stderr = %stderr, "tmux new-session failed");
            return Err(MuxError::SpawnFailed(stderr.to_string()));
        }

        Ok(())
    }

    async fn send_literal(&self, name: &str, text: &str) -> Result<(), MuxError> {
        let full = self.full_name(name);
        let output = Command::new("tmux")
            .args(["send-keys", "-t", &full, "-l", "--", text])
            .output()
            .await
            .map_err(|e| MuxError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MuxError::NotFound(full));
        }
        Ok(())
    }

    async fn send_enter(&self, name: &str) -> Result<(), MuxError> {
        let full = self.full_name(name);
        let output = Command::new("tmux")
            .args(["send-keys", "-t", &full, "Enter"])
            .output()
            .await
            .map_err(|e| MuxError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MuxError::NotFound(full));
        }
        Ok(())
    }

    async fn send_keys(&self, name: &str, keys: &[&str]) -> Result<(), MuxError> {
        let full = self.full_name(name);
        let mut args = vec!["send-keys", "-t", full.as_str()];
        args.extend_from_slice(keys);

        let output = Command::new("tmux")
            .args(&args)
            .output()
            .await
            .map_err(|e| MuxError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MuxError::NotFound(full));
        }
        Ok(())
    }

    async fn capture_pane(&self, name: &str, lines: u32) -> Result<String, MuxError> {
        let full = self.full_name(name);
        let output = Command::new("tmux")
            .args([
                "capture-pane",
                "-t",
                &full,
                "-p",
                "-S",
                &format!("-{lines}"),
            ])
            .output()
            .await
            .map_err(|e| MuxError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MuxError::NotFound(full));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn foreground_cmd(&self, name: &str) -> Result<String, MuxError> {
        let full = self.full_name(name);
        let output = Command::new("tmux")
            .args(["display-message", "-t", &full, "-p", "#{pane_current_command}"])
            .output()
            .await
            .map_err(|e| MuxError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(MuxError::NotFound(full));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn kill(&self, name: &str) -> Result<(), MuxError> {
        let full = self.full_name(name);
        // Best-effort: the session may already be dead.
        let _ = Command::new("tmux")
            .args(["kill-session", "-t", &full])
            .output()
            .await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
