// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The response pipeline (spec §4.H): turns an agent's raw transcript text
//! into the effects needed to deliver it back to the manager — media tags
//! extracted and sent out-of-band, the remaining prose split to fit the
//! transport limit and converted to HTML chunk by chunk.

pub mod format;
pub mod media;

use async_trait::async_trait;
use wrangler_core::{ChatId, Effect, WorkerId};

/// Telegram's hard per-message character cap (spec §8).
const TRANSPORT_CHAR_LIMIT: usize = 4096;

/// Resolve a worker's current chat (spec §4.B `chat_id` file) without the
/// pipeline needing to know how that mapping is stored.
#[async_trait]
pub trait ChatIdLookup: Send + Sync {
    async fn chat_id_for(&self, worker: &str) -> Option<ChatId>;
}

/// Errors that stop a response from being delivered (spec §4.H.2 — "if
/// there's no stamped chat id, drop the response silently" is the hook's
/// job; by the time a response reaches this pipeline the daemon already
/// expects a recipient, so these surface as a real error instead).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("response text is empty")]
    Empty,
    #[error("worker '{0}' has no associated chat")]
    NoChatId(String),
}

/// Turn one agent response into the effects needed to deliver it: a
/// framed `<b>worker:</b>` HTML reply per transport-sized chunk, followed
/// by any out-of-band media sends, followed by clearing the typing
/// indicator (spec §4.H).
pub async fn ingest_response(
    lookup: &impl ChatIdLookup,
    worker: &str,
    raw_text: &str,
) -> Result<Vec<Effect>, PipelineError> {
    if raw_text.trim().is_empty() {
        return Err(PipelineError::Empty);
    }
    let chat_id = lookup
        .chat_id_for(worker)
        .await
        .ok_or_else(|| PipelineError::NoChatId(worker.to_string()))?;

    let (cleaned, tags) = media::extract_media_tags(raw_text);
    let cleaned = cleaned.trim();

    let mut effects = Vec::with_capacity(tags.len() + 2);

    if !cleaned.is_empty() {
        let frame_prefix = format!("<b>{worker}:</b>\n");
        let rendered = format::split_and_render_for_transport(
            cleaned,
            TRANSPORT_CHAR_LIMIT,
            frame_prefix.chars().count(),
        );
        let chunks: Vec<String> = rendered
            .into_iter()
            .enumerate()
            .map(|(i, html)| {
                if i == 0 {
                    format!("{frame_prefix}{html}")
                } else {
                    html
                }
            })
            .collect();
        effects.push(Effect::ReplyHtmlChunks {
            chat_id: chat_id.clone(),
            chunks,
        });
    }

    for tag in tags {
        effects.push(match tag.kind {
            media::MediaKind::Image => Effect::SendImage {
                chat_id: chat_id.clone(),
                path: tag.path,
                caption: tag.caption,
            },
            media::MediaKind::File => Effect::SendFile {
                chat_id: chat_id.clone(),
                path: tag.path,
                caption: tag.caption,
            },
        });
    }

    effects.push(Effect::StopTyping {
        worker: WorkerId::new(worker.to_string()),
    });

    Ok(effects)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
