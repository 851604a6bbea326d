// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session coordination filesystem (spec §3, §4.B, §6).
//!
//! Two unrelated processes — the daemon and the stop-event hook running
//! inside a worker's own process tree — share state only through files.
//! Every per-worker file is owned by exactly one writer for a given event,
//! so no locking is needed here; the routing engine's per-worker mutex
//! (`wrangler-daemon::concurrency`) is what serializes sends, not this
//! module.

use std::path::{Path, PathBuf};
use thiserror::Error;
use wrangler_core::{is_pending as ttl_is_pending, Clock};

#[derive(Debug, Error)]
pub enum CoordFsError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn wrap(path: &Path, source: std::io::Error) -> CoordFsError {
    CoordFsError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> Result<(), CoordFsError> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|e| wrap(path, e))
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: u32) -> Result<(), CoordFsError> {
    Ok(())
}

async fn write_secret_file(path: &Path, contents: &str) -> Result<(), CoordFsError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| wrap(path, e))?;
    set_mode(path, 0o600).await
}

/// Filesystem view of one worker's coordination directory
/// (`<sessions-root>/<worker>/`).
#[derive(Clone)]
pub struct CoordFs {
    sessions_root: PathBuf,
}

impl CoordFs {
    pub fn new(sessions_root: impl Into<PathBuf>) -> Self {
        Self {
            sessions_root: sessions_root.into(),
        }
    }

    fn worker_dir(&self, name: &str) -> PathBuf {
        self.sessions_root.join(name)
    }

    /// Create the worker's directory (mode 0700) and its `inbox/` (mode
    /// 0700) if not already present. Idempotent.
    pub async fn ensure_worker_dir(&self, name: &str) -> Result<(), CoordFsError> {
        let dir = self.worker_dir(name);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| wrap(&dir, e))?;
        set_mode(&dir, 0o700).await?;
        self.ensure_inbox(name).await
    }

    /// Remove the worker's entire coordination directory (end-command
    /// cleanup, spec §4.G.dispatch `end`).
    pub async fn remove_worker_dir(&self, name: &str) -> Result<(), CoordFsError> {
        let dir = self.worker_dir(name);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(wrap(&dir, e)),
        }
    }

    pub async fn set_pending(&self, name: &str, now_unix_secs: u64) -> Result<(), CoordFsError> {
        write_secret_file(&self.worker_dir(name).join("pending"), &now_unix_secs.to_string()).await
    }

    pub async fn clear_pending(&self, name: &str) -> Result<(), CoordFsError> {
        let path = self.worker_dir(name).join("pending");
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(wrap(&path, e)),
        }
    }

    /// Whether a pending stamp exists and is within the 600s TTL (spec
    /// §3 "auto-expires after 10 minutes"). A stale stamp reads as clear.
    pub async fn is_pending(&self, name: &str, clock: &impl Clock) -> bool {
        let Some(stamped_at) = self.pending_stamp(name).await else {
            return false;
        };
        ttl_is_pending(stamped_at, clock.now_unix())
    }

    /// Seconds since `name`'s pending stamp was written, if one exists and
    /// is still within the TTL. Used by `/progress` (spec §4.G.dispatch)
    /// and the typing loop.
    pub async fn pending_age_secs(&self, name: &str, clock: &impl Clock) -> Option<u64> {
        let stamped_at = self.pending_stamp(name).await?;
        let now = clock.now_unix();
        ttl_is_pending(stamped_at, now).then(|| now.saturating_sub(stamped_at))
    }

    async fn pending_stamp(&self, name: &str) -> Option<u64> {
        let path = self.worker_dir(name).join("pending");
        let contents = tokio::fs::read_to_string(&path).await.ok()?;
        contents.trim().parse::<u64>().ok()
    }

    pub async fn set_chat_id(&self, name: &str, chat_id: &str) -> Result<(), CoordFsError> {
        write_secret_file(&self.worker_dir(name).join("chat_id"), chat_id).await
    }

    /// The chat identity responses for this worker are delivered to.
    /// Absence means the worker is not chat-attached (spec §3 invariant).
    pub async fn get_chat_id(&self, name: &str) -> Option<String> {
        let path = self.worker_dir(name).join("chat_id");
        tokio::fs::read_to_string(&path)
            .await
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub async fn ensure_inbox(&self, name: &str) -> Result<(), CoordFsError> {
        let inbox = self.worker_dir(name).join("inbox");
        tokio::fs::create_dir_all(&inbox)
            .await
            .map_err(|e| wrap(&inbox, e))?;
        set_mode(&inbox, 0o700).await
    }

    pub async fn purge_inbox(&self, name: &str) -> Result<(), CoordFsError> {
        let inbox = self.worker_dir(name).join("inbox");
        match tokio::fs::remove_dir_all(&inbox).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(wrap(&inbox, e)),
        }
    }

    pub fn inbox_path(&self, name: &str) -> PathBuf {
        self.worker_dir(name).join("inbox")
    }
}

mod node;
pub use node::NodeFs;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
