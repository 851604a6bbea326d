// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Out-of-band media tags (spec §4.H, §6): `[[image:/path|caption?]]` and
//! `[[file:/path|caption?]]`, extracted from an agent's raw response text
//! before markdown-to-HTML conversion so they never reach the formatter.

use super::format::{tokenize_fences, Piece};
use std::path::PathBuf;

/// Whether a [`MediaTag`] should be sent as a Telegram photo or a generic
/// document (spec §6 media security — images get a preview, everything
/// else is sent as a plain file).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    File,
}

/// One parsed media tag.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaTag {
    pub kind: MediaKind,
    pub path: PathBuf,
    pub caption: Option<String>,
}

/// Extract every media tag from `text`, returning the text with tags
/// removed (escaped tags are unescaped but left as literal text) alongside
/// the tags found. Tags inside fenced code blocks are left untouched —
/// code showing the tag syntax itself must not be treated as a real tag.
pub fn extract_media_tags(text: &str) -> (String, Vec<MediaTag>) {
    let mut cleaned = String::with_capacity(text.len());
    let mut tags = Vec::new();
    for piece in tokenize_fences(text) {
        match piece {
            Piece::Fence(s) => cleaned.push_str(&s),
            Piece::Text(s) => {
                let (scanned, found) = scan_for_tags(&s);
                cleaned.push_str(&scanned);
                tags.extend(found);
            }
            Piece::InlineCode(_) => unreachable!("tokenize_fences never yields InlineCode"),
        }
    }
    (cleaned, tags)
}

fn scan_for_tags(text: &str) -> (String, Vec<MediaTag>) {
    let mut out = String::with_capacity(text.len());
    let mut tags = Vec::new();
    let mut rest = text;

    loop {
        let Some(idx) = rest.find("[[") else {
            out.push_str(rest);
            break;
        };

        let escaped = idx > 0 && rest.as_bytes()[idx - 1] == b'\\';
        let before = if escaped { &rest[..idx - 1] } else { &rest[..idx] };
        out.push_str(before);

        let Some(close_rel) = rest[idx..].find("]]") else {
            // Unterminated tag: keep the rest verbatim.
            out.push_str(&rest[idx..]);
            break;
        };
        let whole = &rest[idx..idx + close_rel + 2];

        if escaped {
            // `\[[...]]` is a literal escape: keep the tag text, drop the backslash.
            out.push_str(whole);
        } else {
            let body = &rest[idx + 2..idx + close_rel];
            match parse_tag_body(body) {
                Some(tag) => tags.push(tag),
                None => out.push_str(whole),
            }
        }

        rest = &rest[idx + close_rel + 2..];
    }

    (out, tags)
}

fn parse_tag_body(body: &str) -> Option<MediaTag> {
    let (kind_str, tail) = body.split_once(':')?;
    let kind = match kind_str {
        "image" => MediaKind::Image,
        "file" => MediaKind::File,
        _ => return None,
    };
    let (path_str, caption) = match tail.split_once('|') {
        Some((p, c)) if !c.is_empty() => (p, Some(c.to_string())),
        Some((p, _)) => (p, None),
        None => (tail, None),
    };
    if path_str.is_empty() || !path_str.starts_with('/') {
        return None;
    }
    Some(MediaTag {
        kind,
        path: PathBuf::from(path_str),
        caption,
    })
}

#[cfg(test)]
#[path = "media_tests.rs"]
mod tests;
