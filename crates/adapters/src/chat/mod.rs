// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat-transport client (spec §4.D): a capability set the routing engine
//! and response pipeline depend on, polymorphic over transport. Only one
//! implementation (Telegram) ships today; the trait boundary exists so the
//! core logic never names a transport directly.

mod fake;
mod telegram;

pub use fake::{ChatCall, FakeChatTransport};
pub use telegram::TelegramChat;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use wrangler_core::{ChatId, MessageId};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("download failed: {0}")]
    Download(String),
}

/// An inbound attachment as described by the webhook payload (spec §6).
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_id: String,
    pub filename: Option<String>,
    pub mime: Option<String>,
    pub size: Option<u64>,
}

#[async_trait]
pub trait ChatTransport: Clone + Send + Sync + 'static {
    /// Plain text, no formatting. `reply_to` chains visually (spec §4.H.7).
    async fn send_text(
        &self,
        chat_id: &ChatId,
        text: &str,
        reply_to: Option<&MessageId>,
    ) -> Result<MessageId, ChatError>;

    /// Text already formatted as Telegram-flavored inline HTML.
    async fn send_html(
        &self,
        chat_id: &ChatId,
        html: &str,
        reply_to: Option<&MessageId>,
    ) -> Result<MessageId, ChatError>;

    /// "typing…" chat action (spec §4.I typing loop).
    async fn send_typing(&self, chat_id: &ChatId) -> Result<(), ChatError>;

    async fn send_photo(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<(), ChatError>;

    async fn send_document(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<(), ChatError>;

    /// Download an inbound attachment to `dest`.
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), ChatError>;

    /// Opportunistic reaction on the manager's message. Callers must treat
    /// failure as non-fatal (spec: "omit silently" if unsupported).
    async fn set_reaction(
        &self,
        chat_id: &ChatId,
        message_id: &MessageId,
        emoji: &str,
    ) -> Result<(), ChatError>;

    /// Re-register the bot's command list (spec §4.G.dispatch: every
    /// worker-set change).
    async fn register_commands(&self, commands: &[(String, String)]) -> Result<(), ChatError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
