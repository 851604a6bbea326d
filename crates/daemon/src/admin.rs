// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The admin gate (spec §3 "Admin identity", §4.E): a single privileged
//! chat identity drives the whole bridge. Every event from any other chat
//! is dropped with zero output — the bot is invisible to non-admins.

use parking_lot::Mutex;
use wrangler_adapters::NodeFs;
use wrangler_core::ChatId;

/// Guards the single `admin_chat_id` (spec §5 "written at most twice:
/// learn, persist; read on every event"). Cheap to clone; the inner state
/// is shared.
#[derive(Clone)]
pub struct AdminGate {
    chat_id: std::sync::Arc<Mutex<Option<ChatId>>>,
    node_fs: NodeFs,
}

impl AdminGate {
    /// `preset` comes from configuration (spec §3: "Either pre-set via
    /// configuration or learned from the first message after a fresh
    /// start"). `node_fs` is where the learned value is persisted and
    /// re-read across restarts.
    pub fn new(preset: Option<ChatId>, node_fs: NodeFs) -> Self {
        Self {
            chat_id: std::sync::Arc::new(Mutex::new(preset)),
            node_fs,
        }
    }

    /// Re-validate the persisted admin id on startup (spec §3 "persisted
    /// across restarts"), when no configuration preset overrides it.
    pub async fn load_persisted(&self) {
        if self.chat_id.lock().is_some() {
            return;
        }
        if let Some(persisted) = self.node_fs.load_last_chat_id().await {
            *self.chat_id.lock() = Some(ChatId::new(persisted));
        }
    }

    /// Current admin chat id, if known.
    pub fn current(&self) -> Option<ChatId> {
        self.chat_id.lock().clone()
    }

    /// Admit or drop an inbound event's chat id (spec §4.E). On the very
    /// first call with no admin set yet, the sender becomes the admin and
    /// is persisted. Every subsequent call admits only that same chat id.
    pub async fn admit(&self, sender: &ChatId) -> bool {
        let already_admin = {
            let mut guard = self.chat_id.lock();
            match guard.as_ref() {
                Some(admin) => return admin == sender,
                None => {
                    *guard = Some(sender.clone());
                    false
                }
            }
        };
        debug_assert!(!already_admin);
        let _ = self.node_fs.save_last_chat_id(sender.as_str()).await;
        tracing::info!(chat_id = %sender, "admin identity learned from first message");
        true
    }
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
