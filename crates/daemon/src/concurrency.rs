// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrency primitives (spec §4.I, §5): the per-worker lock map and the
//! typing-indicator loop. Both are process-wide, lazily populated, and
//! guarded by their own narrow meta-mutex rather than the thing they
//! protect (spec §5 "locks map: mutated under its own meta-mutex").

use parking_lot::Mutex as SyncMutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use wrangler_adapters::ChatTransport;
use wrangler_core::ChatId;

/// How often the typing indicator is re-emitted while a worker is pending
/// (spec §4.I: "every ~4 seconds").
const TYPING_INTERVAL: Duration = Duration::from_secs(4);

/// Lazily-created, process-wide map of per-worker mutexes (spec §5). The
/// mutex for a worker is created on first use and dropped when the worker
/// ends — there is no need to explicitly remove it from the map (an ended
/// worker is simply never looked up again), but [`LockMap::forget`] is
/// provided so long-lived daemons don't accumulate entries for workers
/// that come and go.
#[derive(Clone, Default)]
pub struct LockMap {
    inner: Arc<SyncMutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

/// A held per-worker lock. The semantic "send literal, then submit" pair
/// (spec §4.G send semantics, §9) must both happen while this guard is
/// alive — that's the single most important concurrency invariant in the
/// system, and it's enforced by construction: nothing outside this module
/// can get at the inner mutex directly.
pub struct WorkerLock {
    _guard: tokio::sync::OwnedMutexGuard<()>,
}

impl LockMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex_for(&self, worker: &str) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock();
        map.entry(worker.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Acquire the lock for `worker`. Holding the returned guard across
    /// both the literal-text write and the Enter submit is what defeats
    /// interleaving between two concurrent sends to the same worker.
    pub async fn lock(&self, worker: &str) -> WorkerLock {
        let mutex = self.mutex_for(worker);
        let guard = mutex.lock_owned().await;
        WorkerLock { _guard: guard }
    }

    pub fn forget(&self, worker: &str) {
        self.inner.lock().remove(worker);
    }
}

/// Manages the typing-indicator background task per worker (spec §4.I).
/// Starting a typing loop for a worker that already has one running is a
/// no-op — "let an existing one continue", not a second overlapping task.
#[derive(Clone)]
pub struct TypingLoops<C: ChatTransport> {
    chat: C,
    handles: Arc<SyncMutex<HashMap<String, JoinHandle<()>>>>,
}

impl<C: ChatTransport> TypingLoops<C> {
    pub fn new(chat: C) -> Self {
        Self {
            chat,
            handles: Arc::new(SyncMutex::new(HashMap::new())),
        }
    }

    pub fn start(&self, worker: &str, chat_id: ChatId) {
        let mut handles = self.handles.lock();
        if handles.contains_key(worker) {
            return;
        }
        let chat = self.chat.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(TYPING_INTERVAL).await;
                if chat.send_typing(&chat_id).await.is_err() {
                    tracing::debug!(%chat_id, "typing indicator send failed, continuing loop");
                }
            }
        });
        handles.insert(worker.to_string(), handle);
    }

    /// Cancel the typing loop for `worker` (spec: "cancelled on clear" or
    /// on worker-end). A no-op if none is running.
    pub fn stop(&self, worker: &str) {
        if let Some(handle) = self.handles.lock().remove(worker) {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "concurrency_tests.rs"]
mod tests;
