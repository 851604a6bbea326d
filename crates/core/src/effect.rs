// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects the routing engine and response pipeline ask the daemon to
//! perform. Keeping these as data (rather than calling adapters directly)
//! is what makes the routing engine and response-pipeline formatting
//! testable without a live multiplexer or chat transport: tests assert on
//! the emitted `Vec<Effect>`, the daemon's executor is the only thing that
//! touches real adapters.

use crate::chat::{ChatId, MessageId};
use crate::worker::WorkerId;
use std::path::PathBuf;

/// A single side effect to execute. Zero or more are produced per inbound
/// event (spec §4.G: "Output: zero or more side effects").
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send literal text to a worker's multiplexer session, submit with
    /// Enter, and stamp `pending`/`chat_id` for it.
    SendToWorker {
        worker: WorkerId,
        text: String,
        chat_id: ChatId,
        /// Set focus to this worker as part of the same routing decision.
        set_focus: bool,
        /// The manager's original message, if any — the executor places
        /// the opportunistic "👀" receipt reaction here once the send is
        /// confirmed accepted (spec §4.G send semantics).
        message_id: Option<MessageId>,
    },

    /// Send a raw key sequence (e.g. `Escape`) with no text submit, no
    /// pending stamp (used by `/pause`).
    SendKeys { worker: WorkerId, keys: Vec<String> },

    /// Create a new multiplexer session for `worker` and start the agent.
    CreateWorker {
        worker: WorkerId,
        cwd: Option<PathBuf>,
    },

    /// Kill a worker's session and clean up its coordination directory.
    EndWorker { worker: WorkerId },

    /// Kill and respawn the agent process within an existing session.
    RelaunchWorker { worker: WorkerId },

    /// Change the focused worker (`None` clears focus).
    SetFocus { worker: Option<WorkerId> },

    /// Re-register the chat transport's command list (worker set changed).
    RefreshCommandList,

    /// Plain-text reply to the manager, no formatting applied.
    ReplyText {
        chat_id: ChatId,
        text: String,
        reply_to: Option<MessageId>,
    },

    /// One or more inline-HTML reply chunks (already escaped/formatted and
    /// transport-limit split by the response pipeline), sent in order with
    /// each chunk after the first chaining to the previous one's message
    /// id so the thread reads visually together (spec §4.H.7).
    ReplyHtmlChunks {
        chat_id: ChatId,
        chunks: Vec<String>,
    },

    /// Send an image out-of-band (spec §4.H media tags, §6 media security).
    SendImage {
        chat_id: ChatId,
        path: PathBuf,
        caption: Option<String>,
    },

    /// Send a non-image file out-of-band.
    SendFile {
        chat_id: ChatId,
        path: PathBuf,
        caption: Option<String>,
    },

    /// Download an inbound attachment into a worker's inbox.
    DownloadAttachment {
        worker: WorkerId,
        file_id: String,
        suggested_name: Option<String>,
        /// MIME type as reported by the chat transport, if any (spec
        /// §4.G rule 1: the forwarded text names filename/size/MIME/path).
        mime: Option<String>,
        /// Size in bytes as reported by the chat transport, if any.
        size: Option<u64>,
    },

    /// Place an opportunistic reaction on the manager's original message
    /// (spec: omit silently if the transport lacks the capability).
    SetReaction {
        chat_id: ChatId,
        message_id: MessageId,
        emoji: String,
    },

    /// Start (or let an existing one continue) emitting the "typing" chat
    /// action every ~4s while `worker` is pending.
    StartTyping { worker: WorkerId, chat_id: ChatId },

    /// Stop the typing loop for `worker` (pending cleared).
    StopTyping { worker: WorkerId },
}

impl Effect {
    /// Effect name for structured log spans.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::SendToWorker { .. } => "send_to_worker",
            Effect::SendKeys { .. } => "send_keys",
            Effect::CreateWorker { .. } => "create_worker",
            Effect::EndWorker { .. } => "end_worker",
            Effect::RelaunchWorker { .. } => "relaunch_worker",
            Effect::SetFocus { .. } => "set_focus",
            Effect::RefreshCommandList => "refresh_command_list",
            Effect::ReplyText { .. } => "reply_text",
            Effect::ReplyHtmlChunks { .. } => "reply_html_chunks",
            Effect::SendImage { .. } => "send_image",
            Effect::SendFile { .. } => "send_file",
            Effect::DownloadAttachment { .. } => "download_attachment",
            Effect::SetReaction { .. } => "set_reaction",
            Effect::StartTyping { .. } => "start_typing",
            Effect::StopTyping { .. } => "stop_typing",
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
