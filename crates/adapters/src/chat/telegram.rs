// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Telegram implementation of [`ChatTransport`], built on `teloxide`'s
//! bot-API client.

use super::{ChatError, ChatTransport};
use async_trait::async_trait;
use std::path::Path;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatAction, InputFile, MessageId as TlMessageId, ParseMode, ReactionType};
use wrangler_core::{ChatId, MessageId};

#[derive(Clone)]
pub struct TelegramChat {
    bot: Bot,
}

impl TelegramChat {
    pub fn new(token: String) -> Self {
        Self { bot: Bot::new(token) }
    }

    fn chat_id(chat_id: &ChatId) -> Result<teloxide::types::ChatId, ChatError> {
        chat_id
            .as_str()
            .parse::<i64>()
            .map(teloxide::types::ChatId)
            .map_err(|e| ChatError::Transport(format!("invalid chat id {chat_id}: {e}")))
    }

    fn message_id(message_id: &MessageId) -> Result<TlMessageId, ChatError> {
        message_id
            .as_str()
            .parse::<i32>()
            .map(TlMessageId)
            .map_err(|e| ChatError::Transport(format!("invalid message id {message_id}: {e}")))
    }
}

#[async_trait]
impl ChatTransport for TelegramChat {
    async fn send_text(
        &self,
        chat_id: &ChatId,
        text: &str,
        reply_to: Option<&MessageId>,
    ) -> Result<MessageId, ChatError> {
        let mut request = self.bot.send_message(Self::chat_id(chat_id)?, text);
        if let Some(reply_to) = reply_to {
            request = request.reply_to_message_id(Self::message_id(reply_to)?);
        }
        let sent = request
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Ok(MessageId::new(sent.id.0.to_string()))
    }

    async fn send_html(
        &self,
        chat_id: &ChatId,
        html: &str,
        reply_to: Option<&MessageId>,
    ) -> Result<MessageId, ChatError> {
        let mut request = self
            .bot
            .send_message(Self::chat_id(chat_id)?, html)
            .parse_mode(ParseMode::Html);
        if let Some(reply_to) = reply_to {
            request = request.reply_to_message_id(Self::message_id(reply_to)?);
        }
        let sent = request
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Ok(MessageId::new(sent.id.0.to_string()))
    }

    async fn send_typing(&self, chat_id: &ChatId) -> Result<(), ChatError> {
        self.bot
            .send_chat_action(Self::chat_id(chat_id)?, ChatAction::Typing)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<(), ChatError> {
        let mut request = self
            .bot
            .send_photo(Self::chat_id(chat_id)?, InputFile::file(path));
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        request
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<(), ChatError> {
        let mut request = self
            .bot
            .send_document(Self::chat_id(chat_id)?, InputFile::file(path));
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        request
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), ChatError> {
        let file = self
            .bot
            .get_file(file_id)
            .send()
            .await
            .map_err(|e| ChatError::Download(e.to_string()))?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ChatError::Download(e.to_string()))?;
        }
        let mut out = tokio::fs::File::create(dest)
            .await
            .map_err(|e| ChatError::Download(e.to_string()))?;
        self.bot
            .download_file(&file.path, &mut out)
            .await
            .map_err(|e| ChatError::Download(e.to_string()))
    }

    async fn set_reaction(
        &self,
        chat_id: &ChatId,
        message_id: &MessageId,
        emoji: &str,
    ) -> Result<(), ChatError> {
        // Opportunistic (spec: omit silently if the transport rejects it);
        // callers are expected not to propagate this error to the user.
        self.bot
            .set_message_reaction(Self::chat_id(chat_id)?, Self::message_id(message_id)?)
            .reaction(vec![ReactionType::Emoji {
                emoji: emoji.to_string(),
            }])
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn register_commands(&self, commands: &[(String, String)]) -> Result<(), ChatError> {
        let commands = commands
            .iter()
            .map(|(name, description)| BotCommand::new(name, description))
            .collect::<Vec<_>>();
        self.bot
            .set_my_commands(commands)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        Ok(())
    }
}
