// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake multiplexer adapter for testing routing/daemon logic without tmux.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MultiplexerAdapter, MuxError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum MuxCall {
    Create {
        name: String,
        cwd: PathBuf,
        agent_cmd: String,
    },
    SendLiteral {
        name: String,
        text: String,
    },
    SendEnter {
        name: String,
    },
    SendKeys {
        name: String,
        keys: Vec<String>,
    },
    Kill {
        name: String,
    },
}

#[derive(Debug, Clone, Default)]
struct FakeWorkerSession {
    cwd: PathBuf,
    agent_cmd: String,
    pane: Vec<String>,
    foreground_cmd: String,
    /// Whether `capture_pane` returns fixed `pane` content (simulating a
    /// pane that never changes, i.e. the agent hasn't accepted input yet)
    /// or synthesizes fresh content on every call (simulating normal
    /// activity, i.e. input was accepted). Defaults to live/changing.
    frozen_pane: bool,
    capture_calls: u32,
}

#[derive(Default)]
struct FakeMuxState {
    sessions: HashMap<String, FakeWorkerSession>,
    calls: Vec<MuxCall>,
}

/// In-memory stand-in for a tmux server. Tests assert on `calls()` and seed
/// pane/foreground-command state with the `set_*` helpers.
#[derive(Clone, Default)]
pub struct FakeMultiplexer {
    inner: Arc<Mutex<FakeMuxState>>,
}

impl FakeMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MuxCall> {
        self.inner.lock().calls.clone()
    }

    /// Pre-seed a session as if it had been created out of band (e.g. to
    /// simulate startup adoption of a pre-existing tmux session).
    pub fn seed_session(&self, name: &str) {
        self.inner
            .lock()
            .sessions
            .insert(name.to_string(), FakeWorkerSession::default());
    }

    pub fn set_foreground_cmd(&self, name: &str, cmd: &str) {
        if let Some(s) = self.inner.lock().sessions.get_mut(name) {
            s.foreground_cmd = cmd.to_string();
        }
    }

    pub fn set_pane(&self, name: &str, lines: Vec<String>) {
        if let Some(s) = self.inner.lock().sessions.get_mut(name) {
            s.pane = lines;
        }
    }

    /// Freeze `name`'s pane so every `capture_pane` call returns identical
    /// content — simulates a worker that hasn't accepted input yet, for
    /// exercising the send-retry path.
    pub fn freeze_pane(&self, name: &str) {
        if let Some(s) = self.inner.lock().sessions.get_mut(name) {
            s.frozen_pane = true;
        }
    }
}

#[async_trait]
impl MultiplexerAdapter for FakeMultiplexer {
    async fn list(&self) -> Result<Vec<String>, MuxError> {
        Ok(self.inner.lock().sessions.keys().cloned().collect())
    }

    async fn exists(&self, name: &str) -> Result<bool, MuxError> {
        Ok(self.inner.lock().sessions.contains_key(name))
    }

    async fn create(&self, name: &str, cwd: &Path, agent_cmd: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        if inner.sessions.contains_key(name) {
            return Err(MuxError::AlreadyExists(name.to_string()));
        }
        inner.calls.push(MuxCall::Create {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            agent_cmd: agent_cmd.to_string(),
        });
        inner.sessions.insert(
            name.to_string(),
            FakeWorkerSession {
                cwd: cwd.to_path_buf(),
                agent_cmd: agent_cmd.to_string(),
                pane: Vec::new(),
                foreground_cmd: agent_cmd.to_string(),
            },
        );
        Ok(())
    }

    async fn send_literal(&self, name: &str, text: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        if !inner.sessions.contains_key(name) {
            return Err(MuxError::NotFound(name.to_string()));
        }
        inner.calls.push(MuxCall::SendLiteral {
            name: name.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_enter(&self, name: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        if !inner.sessions.contains_key(name) {
            return Err(MuxError::NotFound(name.to_string()));
        }
        inner
            .calls
            .push(MuxCall::SendEnter { name: name.to_string() });
        Ok(())
    }

    async fn send_keys(&self, name: &str, keys: &[&str]) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        if !inner.sessions.contains_key(name) {
            return Err(MuxError::NotFound(name.to_string()));
        }
        inner.calls.push(MuxCall::SendKeys {
            name: name.to_string(),
            keys: keys.iter().map(|s| s.to_string()).collect(),
        });
        Ok(())
    }

    async fn capture_pane(&self, name: &str, lines: u32) -> Result<String, MuxError> {
        let mut inner = self.inner.lock();
        let session = inner
            .sessions
            .get_mut(name)
            .ok_or_else(|| MuxError::NotFound(name.to_string()))?;
        if session.frozen_pane {
            let start = session.pane.len().saturating_sub(lines as usize);
            return Ok(session.pane[start..].join("\n"));
        }
        session.capture_calls += 1;
        Ok(format!("capture-{}", session.capture_calls))
    }

    async fn foreground_cmd(&self, name: &str) -> Result<String, MuxError> {
        let inner = self.inner.lock();
        inner
            .sessions
            .get(name)
            .map(|s| s.foreground_cmd.clone())
            .ok_or_else(|| MuxError::NotFound(name.to_string()))
    }

    async fn kill(&self, name: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        inner.sessions.remove(name);
        inner.calls.push(MuxCall::Kill {
            name: name.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
