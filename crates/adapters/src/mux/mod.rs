// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multiplexer adapter: create/list/kill named terminal sessions, send text
//! or raw keys, inspect the foreground command (spec §4.A). The multiplexer
//! is the authoritative worker store — the registry above this layer never
//! caches what this module can answer live.

mod noop;
mod tmux;

pub use noop::NoOpMultiplexer;
pub use tmux::TmuxAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMultiplexer, MuxCall};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuxError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("session already exists: {0}")]
    AlreadyExists(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Adapter over a terminal multiplexer (tmux in production). Every method
/// takes the worker's short name; the adapter owns the `prefix+name`
/// translation so callers never see the underlying session id.
#[async_trait]
pub trait MultiplexerAdapter: Clone + Send + Sync + 'static {
    /// Names of all worker sessions currently known to the multiplexer.
    /// Empty (not an error) if the multiplexer daemon isn't running.
    async fn list(&self) -> Result<Vec<String>, MuxError>;

    /// Whether a session named `prefix+name` exists.
    async fn exists(&self, name: &str) -> Result<bool, MuxError>;

    /// Create a detached 200x50 session at `cwd` running `agent_cmd`, with
    /// the bridge's coordination env vars set on the session. Errors with
    /// `AlreadyExists` if the session is already present.
    async fn create(&self, name: &str, cwd: &Path, agent_cmd: &str) -> Result<(), MuxError>;

    /// Literal text, no Enter submit.
    async fn send_literal(&self, name: &str, text: &str) -> Result<(), MuxError>;

    /// The Enter key, no other input.
    async fn send_enter(&self, name: &str) -> Result<(), MuxError>;

    /// Raw key names (e.g. `Escape`), no newline submit.
    async fn send_keys(&self, name: &str, keys: &[&str]) -> Result<(), MuxError>;

    /// Capture the last `lines` lines of the pane, most recent last.
    async fn capture_pane(&self, name: &str, lines: u32) -> Result<String, MuxError>;

    /// Name of the program currently holding the pane's foreground process
    /// (used by `/progress` and `/relaunch`).
    async fn foreground_cmd(&self, name: &str) -> Result<String, MuxError>;

    /// Terminate the session.
    async fn kill(&self, name: &str) -> Result<(), MuxError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
