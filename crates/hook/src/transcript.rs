// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extracts the agent's reply from a transcript (spec §4.C.4): the
//! line-delimited JSON an agent session appends to as it runs, one line per
//! turn. Only `text` content blocks from `assistant` turns after the last
//! `user` turn are forwarded — tool calls, tool results, and thinking
//! blocks never leak into the chat.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TranscriptLine {
    #[serde(rename = "type")]
    kind: String,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Concatenate (double-newline separated) every `text` block from every
/// `assistant` turn that appears after the last `user` turn. Malformed
/// lines are skipped rather than aborting the whole extraction — a single
/// bad line (e.g. from a torn write) shouldn't blank out a good response.
pub fn extract_latest_reply(contents: &str) -> String {
    let lines: Vec<TranscriptLine> = contents
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect();

    let last_user_idx = lines.iter().rposition(|l| l.kind == "user");
    let start = last_user_idx.map_or(0, |i| i + 1);

    lines[start..]
        .iter()
        .filter(|l| l.kind == "assistant")
        .flat_map(|l| l.message.iter())
        .flat_map(|m| m.content.iter())
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
