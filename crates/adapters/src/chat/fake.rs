// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake chat transport for testing routing/response-pipeline logic without
//! a live bot token.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ChatError, ChatTransport};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wrangler_core::{ChatId, MessageId};

#[derive(Debug, Clone)]
pub enum ChatCall {
    SendText {
        chat_id: ChatId,
        text: String,
        reply_to: Option<MessageId>,
    },
    SendHtml {
        chat_id: ChatId,
        html: String,
        reply_to: Option<MessageId>,
    },
    SendTyping {
        chat_id: ChatId,
    },
    SendPhoto {
        chat_id: ChatId,
        path: PathBuf,
        caption: Option<String>,
    },
    SendDocument {
        chat_id: ChatId,
        path: PathBuf,
        caption: Option<String>,
    },
    DownloadFile {
        file_id: String,
        dest: PathBuf,
    },
    SetReaction {
        chat_id: ChatId,
        message_id: MessageId,
        emoji: String,
    },
    RegisterCommands {
        commands: Vec<(String, String)>,
    },
}

#[derive(Default)]
struct FakeChatState {
    calls: Vec<ChatCall>,
    next_message_id: u64,
    reactions_supported: bool,
    fail_sends: bool,
}

#[derive(Clone)]
pub struct FakeChatTransport {
    inner: Arc<Mutex<FakeChatState>>,
}

impl Default for FakeChatTransport {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeChatState {
                calls: Vec::new(),
                next_message_id: 1,
                reactions_supported: true,
                fail_sends: false,
            })),
        }
    }
}

impl FakeChatTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.inner.lock().calls.clone()
    }

    /// Simulate a transport without reaction support (spec: omit silently).
    pub fn disable_reactions(&self) {
        self.inner.lock().reactions_supported = false;
    }

    /// Simulate every outbound send failing (spec §7 `TransportFailure`).
    pub fn fail_sends(&self) {
        self.inner.lock().fail_sends = true;
    }
}

fn next_id(inner: &mut FakeChatState) -> MessageId {
    let id = inner.next_message_id;
    inner.next_message_id += 1;
    MessageId::new(id.to_string())
}

#[async_trait]
impl ChatTransport for FakeChatTransport {
    async fn send_text(
        &self,
        chat_id: &ChatId,
        text: &str,
        reply_to: Option<&MessageId>,
    ) -> Result<MessageId, ChatError> {
        let mut inner = self.inner.lock();
        if inner.fail_sends {
            return Err(ChatError::Transport("simulated failure".into()));
        }
        inner.calls.push(ChatCall::SendText {
            chat_id: chat_id.clone(),
            text: text.to_string(),
            reply_to: reply_to.cloned(),
        });
        Ok(next_id(&mut inner))
    }

    async fn send_html(
        &self,
        chat_id: &ChatId,
        html: &str,
        reply_to: Option<&MessageId>,
    ) -> Result<MessageId, ChatError> {
        let mut inner = self.inner.lock();
        if inner.fail_sends {
            return Err(ChatError::Transport("simulated failure".into()));
        }
        inner.calls.push(ChatCall::SendHtml {
            chat_id: chat_id.clone(),
            html: html.to_string(),
            reply_to: reply_to.cloned(),
        });
        Ok(next_id(&mut inner))
    }

    async fn send_typing(&self, chat_id: &ChatId) -> Result<(), ChatError> {
        self.inner.lock().calls.push(ChatCall::SendTyping {
            chat_id: chat_id.clone(),
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<(), ChatError> {
        let mut inner = self.inner.lock();
        if inner.fail_sends {
            return Err(ChatError::Transport("simulated failure".into()));
        }
        inner.calls.push(ChatCall::SendPhoto {
            chat_id: chat_id.clone(),
            path: path.to_path_buf(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<(), ChatError> {
        let mut inner = self.inner.lock();
        if inner.fail_sends {
            return Err(ChatError::Transport("simulated failure".into()));
        }
        inner.calls.push(ChatCall::SendDocument {
            chat_id: chat_id.clone(),
            path: path.to_path_buf(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), ChatError> {
        if let Some(parent) = dest.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(dest, b"fake attachment bytes");
        self.inner.lock().calls.push(ChatCall::DownloadFile {
            file_id: file_id.to_string(),
            dest: dest.to_path_buf(),
        });
        Ok(())
    }

    async fn set_reaction(
        &self,
        chat_id: &ChatId,
        message_id: &MessageId,
        emoji: &str,
    ) -> Result<(), ChatError> {
        let mut inner = self.inner.lock();
        if !inner.reactions_supported {
            return Err(ChatError::Transport("reactions not supported".into()));
        }
        inner.calls.push(ChatCall::SetReaction {
            chat_id: chat_id.clone(),
            message_id: message_id.clone(),
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn register_commands(&self, commands: &[(String, String)]) -> Result<(), ChatError> {
        self.inner.lock().calls.push(ChatCall::RegisterCommands {
            commands: commands.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
