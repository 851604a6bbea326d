// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node-root persisted state: `last_chat_id` (admin identity) and
//! `last_active` (focused worker), re-validated on startup (spec §3).

use super::{wrap, write_secret_file, CoordFsError};
use std::path::PathBuf;

#[derive(Clone)]
pub struct NodeFs {
    node_root: PathBuf,
}

impl NodeFs {
    pub fn new(node_root: impl Into<PathBuf>) -> Self {
        Self {
            node_root: node_root.into(),
        }
    }

    pub async fn ensure_root(&self) -> Result<(), CoordFsError> {
        tokio::fs::create_dir_all(&self.node_root)
            .await
            .map_err(|e| wrap(&self.node_root, e))
    }

    pub async fn save_last_chat_id(&self, chat_id: &str) -> Result<(), CoordFsError> {
        write_secret_file(&self.node_root.join("last_chat_id"), chat_id).await
    }

    pub async fn load_last_chat_id(&self) -> Option<String> {
        read_trimmed(&self.node_root.join("last_chat_id")).await
    }

    pub async fn save_last_active(&self, worker: &str) -> Result<(), CoordFsError> {
        write_secret_file(&self.node_root.join("last_active"), worker).await
    }

    pub async fn load_last_active(&self) -> Option<String> {
        read_trimmed(&self.node_root.join("last_active")).await
    }

    pub async fn save_port(&self, port: u16) -> Result<(), CoordFsError> {
        write_secret_file(&self.node_root.join("port"), &port.to_string()).await
    }
}

async fn read_trimmed(path: &std::path::Path) -> Option<String> {
    tokio::fs::read_to_string(path)
        .await
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
