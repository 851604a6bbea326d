// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker registry (spec §3, §4.F): a derived view over the
//! multiplexer, never a cache. The only things this module actually owns
//! are the volatile bits the multiplexer has no concept of — the focused
//! pointer and the "has this worker been paused" marker — both rebuilt
//! (or re-validated) on startup rather than treated as ground truth.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use wrangler_adapters::{MultiplexerAdapter, MuxError, NodeFs};
use wrangler_core::{Worker, WorkerId, WorkerStatus};

/// Program names that mean "nothing is running, the pane is at a shell
/// prompt" — used to derive [`WorkerStatus::Idle`] from
/// [`MultiplexerAdapter::foreground_cmd`] (spec §4.A, `/progress`).
const SHELL_NAMES: &[&str] = &["bash", "zsh", "sh", "fish", "dash"];

/// Live view over the multiplexer plus the small amount of volatile
/// metadata the bridge tracks alongside it (spec §3 "Ownership: the
/// multiplexer owns the session; the bridge owns only volatile metadata").
#[derive(Clone)]
pub struct Registry<M: MultiplexerAdapter> {
    mux: M,
    prefix: String,
    node_fs: NodeFs,
    focused: Arc<Mutex<Option<WorkerId>>>,
    /// Workers manually paused via `/pause`, cleared the moment a new send
    /// goes out to them. Never persisted — restart re-derives `idle` for
    /// everything (spec §3 "volatile state is rebuilt on startup").
    paused: Arc<Mutex<HashSet<String>>>,
}

impl<M: MultiplexerAdapter> Registry<M> {
    pub fn new(mux: M, prefix: String, node_fs: NodeFs) -> Self {
        Self {
            mux,
            prefix,
            node_fs,
            focused: Arc::new(Mutex::new(None)),
            paused: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Re-validate the persisted focused worker against the live
    /// multiplexer on startup (spec §3 "Persisted across bridge restarts
    /// in a single flat file, re-validated on startup").
    pub async fn load_persisted_focus(&self) {
        if let Some(name) = self.node_fs.load_last_active().await {
            if matches!(self.mux.exists(&name).await, Ok(true)) {
                *self.focused.lock() = Some(WorkerId::new(name));
            }
        }
    }

    pub async fn exists(&self, name: &str) -> bool {
        matches!(self.mux.exists(name).await, Ok(true))
    }

    /// All workers currently known to the multiplexer, with derived
    /// status (spec §4.F, "Startup adoption scan" — this is the same call
    /// used at boot to adopt pre-existing sessions, there is no separate
    /// adoption step to run).
    pub async fn list(&self) -> Vec<Worker> {
        let names = self.mux.list().await.unwrap_or_default();
        let mut workers = Vec::with_capacity(names.len());
        for name in names {
            let status = self.status_of(&name).await;
            workers.push(Worker {
                session_name: format!("{}{}", self.prefix, name),
                id: WorkerId::new(name),
                status,
            });
        }
        workers
    }

    async fn status_of(&self, name: &str) -> WorkerStatus {
        if self.paused.lock().contains(name) {
            return WorkerStatus::Paused;
        }
        match self.mux.foreground_cmd(name).await {
            Ok(cmd) if SHELL_NAMES.contains(&cmd.trim()) => WorkerStatus::Idle,
            Ok(_) => WorkerStatus::Running,
            Err(_) => WorkerStatus::Idle,
        }
    }

    pub fn focused(&self) -> Option<WorkerId> {
        self.focused.lock().clone()
    }

    /// Change focus and persist it (spec §3). `None` clears focus.
    pub async fn set_focus(&self, worker: Option<WorkerId>) {
        *self.focused.lock() = worker.clone();
        match worker {
            Some(w) => {
                let _ = self.node_fs.save_last_active(w.as_str()).await;
            }
            None => {
                let _ = self.node_fs.save_last_active("").await;
            }
        }
    }

    pub fn mark_paused(&self, name: &str) {
        self.paused.lock().insert(name.to_string());
    }

    /// A send to a worker always clears any prior paused marker — the
    /// worker is evidently receiving input again.
    pub fn clear_paused(&self, name: &str) {
        self.paused.lock().remove(name);
    }

    pub fn forget(&self, name: &str) {
        self.paused.lock().remove(name);
    }

    pub fn mux(&self) -> &M {
        &self.mux
    }

    pub async fn foreground_cmd(&self, name: &str) -> Result<String, MuxError> {
        self.mux.foreground_cmd(name).await
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
