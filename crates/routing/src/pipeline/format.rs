// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Markdown-to-Telegram-HTML rendering and transport-limit chunking
//! (spec §4.H, §8, §9).
//!
//! Fenced code blocks and inline code must never be mangled by either the
//! media-tag scan or the bold/italic pass, so both tokenize the text into
//! opaque (code) and scannable (prose) pieces first and only ever touch
//! the scannable ones. Fences are tokenized before inline code so a
//! ```` ` ```` inside a fence is never mistaken for an inline-code
//! delimiter.

/// One piece of a tokenized message. Fence and inline-code pieces carry
/// their delimiters; only [`Piece::Text`] is ever scanned further.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Piece {
    /// A fenced code block, delimiters included: `` ```lang\nbody\n``` ``.
    Fence(String),
    /// An inline code span, backticks included: `` `body` ``.
    InlineCode(String),
    /// Ordinary prose, safe to scan for tags or markdown emphasis.
    Text(String),
}

/// Split `text` into fence and text pieces. Never yields
/// [`Piece::InlineCode`] — that is a second pass over the text pieces.
pub(crate) fn tokenize_fences(text: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut rest = text;
    loop {
        match rest.find("```") {
            None => {
                if !rest.is_empty() {
                    pieces.push(Piece::Text(rest.to_string()));
                }
                break;
            }
            Some(start) => {
                if start > 0 {
                    pieces.push(Piece::Text(rest[..start].to_string()));
                }
                let after_open = &rest[start + 3..];
                match after_open.find("```") {
                    Some(end) => {
                        pieces.push(Piece::Fence(format!("```{}```", &after_open[..end])));
                        rest = &after_open[end + 3..];
                    }
                    None => {
                        // Unterminated fence: the rest of the message is code,
                        // never scanned for tags or emphasis. A synthetic
                        // closing delimiter keeps the Fence piece's invariant
                        // that it always starts and ends with "```".
                        pieces.push(Piece::Fence(format!("```{after_open}```")));
                        break;
                    }
                }
            }
        }
    }
    pieces
}

/// Split a text piece into inline-code and text pieces (the second stage
/// of tokenization, run only over [`Piece::Text`] survivors of
/// [`tokenize_fences`]).
pub(crate) fn tokenize_inline_code(text: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut rest = text;
    loop {
        match rest.find('`') {
            None => {
                if !rest.is_empty() {
                    pieces.push(Piece::Text(rest.to_string()));
                }
                break;
            }
            Some(start) => {
                if start > 0 {
                    pieces.push(Piece::Text(rest[..start].to_string()));
                }
                let after_open = &rest[start + 1..];
                match after_open.find('`') {
                    Some(end) => {
                        pieces.push(Piece::InlineCode(format!("`{}`", &after_open[..end])));
                        rest = &after_open[end + 1..];
                    }
                    None => {
                        // Unmatched backtick: treat it as literal text rather
                        // than swallow the rest of the message as code.
                        pieces.push(Piece::Text(format!("`{after_open}")));
                        break;
                    }
                }
            }
        }
    }
    pieces
}

/// Run both tokenization stages, producing the final flat sequence of
/// fence/inline-code/text pieces for the whole message.
pub(crate) fn tokenize_protected(text: &str) -> Vec<Piece> {
    tokenize_fences(text)
        .into_iter()
        .flat_map(|piece| match piece {
            Piece::Fence(s) => vec![Piece::Fence(s)],
            Piece::Text(s) => tokenize_inline_code(&s),
            Piece::InlineCode(_) => unreachable!("tokenize_fences never yields InlineCode"),
        })
        .collect()
}

/// Escape the characters Telegram's HTML parse mode treats specially.
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a fenced block (delimiters included) as Telegram's
/// `<pre><code class="language-...">` form. A language tag on the opening
/// fence line is preserved; anything else falls back to a plain `<pre>`.
fn render_fence(fence: &str) -> String {
    let inner = &fence[3..fence.len() - 3];
    let (lang, body) = match inner.find('\n') {
        Some(nl) => {
            let first_line = &inner[..nl];
            if first_line.is_empty() {
                // "```\ncode\n```": no language tag, just strip the separator.
                (None, &inner[nl + 1..])
            } else if first_line
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
            {
                (Some(first_line), &inner[nl + 1..])
            } else {
                // First line isn't a bare identifier, so it's code, not a tag.
                (None, inner)
            }
        }
        None => (None, inner),
    };
    let body = body.strip_suffix('\n').unwrap_or(body);
    let escaped = escape_html(body);
    match lang {
        Some(l) => format!("<pre><code class=\"language-{l}\">{escaped}</code></pre>"),
        None => format!("<pre><code>{escaped}</code></pre>"),
    }
}

/// Render an inline-code span (backticks included) as `<code>...</code>`.
fn render_inline_code(span: &str) -> String {
    format!("<code>{}</code>", escape_html(&span[1..span.len() - 1]))
}

/// Toggle occurrences of `delim` between `open` and `close`, leaving a
/// trailing unpaired delimiter as literal text rather than an unclosed
/// tag.
fn replace_delim(text: &str, delim: &str, open: &str, close: &str) -> String {
    let total = text.matches(delim).count();
    let usable_pairs = total - (total % 2);
    let mut result = String::new();
    let mut rest = text;
    let mut opened = false;
    let mut used = 0;
    while used < usable_pairs {
        let Some(idx) = rest.find(delim) else { break };
        result.push_str(&rest[..idx]);
        result.push_str(if opened { close } else { open });
        opened = !opened;
        rest = &rest[idx + delim.len()..];
        used += 1;
    }
    result.push_str(rest);
    result
}

/// Render a prose (non-code) piece: escape HTML, then apply `**bold**`,
/// `__bold__`, `*italic*`, `_italic_` in that order so a `**` pair is
/// consumed before its halves are mistaken for `*` italics.
fn render_bold_italic(text: &str) -> String {
    let escaped = escape_html(text);
    let bold = replace_delim(&escaped, "**", "<b>", "</b>");
    let italic = replace_delim(&bold, "*", "<i>", "</i>");
    let bold2 = replace_delim(&italic, "__", "<b>", "</b>");
    replace_delim(&bold2, "_", "<i>", "</i>")
}

/// Render a full markdown message (already past media-tag extraction) as
/// Telegram-flavored HTML.
pub fn markdown_to_html(text: &str) -> String {
    tokenize_protected(text)
        .into_iter()
        .map(|piece| match piece {
            Piece::Fence(s) => render_fence(&s),
            Piece::InlineCode(s) => render_inline_code(&s),
            Piece::Text(s) => render_bold_italic(&s),
        })
        .collect()
}

fn fence_byte_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut offset = 0usize;
    for piece in tokenize_fences(text) {
        match piece {
            Piece::Fence(s) => {
                ranges.push((offset, offset + s.len()));
                offset += s.len();
            }
            Piece::Text(s) => offset += s.len(),
            Piece::InlineCode(_) => unreachable!("tokenize_fences never yields InlineCode"),
        }
    }
    ranges
}

fn in_fence(ranges: &[(usize, usize)], pos: usize) -> bool {
    ranges.iter().any(|&(s, e)| pos > s && pos < e)
}

fn char_boundary_after(text: &str, start: usize, n_chars: usize) -> usize {
    let mut count = 0;
    for (idx, _) in text[start..].char_indices() {
        if count == n_chars {
            return start + idx;
        }
        count += 1;
    }
    text.len()
}

fn skip_leading_newlines(text: &str, pos: usize) -> usize {
    let mut p = pos;
    while p < text.len() && text.as_bytes()[p] == b'\n' {
        p += 1;
    }
    p
}

/// Pick the best place to cut within `text[start..window_end]`, preferring
/// a blank line, then a newline, then whitespace, then a hard cut —
/// skipping any candidate that would land inside a fenced code block
/// (spec §9: "never split inside an unclosed code fence").
fn best_split_point(text: &str, start: usize, window_end: usize, ranges: &[(usize, usize)]) -> usize {
    let window = &text[start..window_end];
    if let Some(rel) = window.rfind("\n\n") {
        let candidate = start + rel + 2;
        if !in_fence(ranges, candidate) {
            return candidate;
        }
    }
    if let Some(rel) = window.rfind('\n') {
        let candidate = start + rel + 1;
        if !in_fence(ranges, candidate) {
            return candidate;
        }
    }
    if let Some(rel) = window.rfind(char::is_whitespace) {
        let candidate = start + rel + 1;
        if !in_fence(ranges, candidate) {
            return candidate;
        }
    }
    let mut cut = window_end;
    while cut > start && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}

/// Split raw (pre-HTML) markdown text into chunks of at most `limit`
/// characters each, operating on the raw text so the fence-aware split
/// point detection stays simple. Kept as a standalone, independently
/// testable primitive; [`split_and_render_for_transport`] is what the
/// pipeline actually uses to produce transport-safe chunks, since HTML
/// rendering can grow a chunk past a raw-text budget (escaping, emphasis
/// tags, fence wrapping).
pub fn split_for_transport(text: &str, limit: usize) -> Vec<String> {
    if limit == 0 || text.chars().count() <= limit {
        return vec![text.to_string()];
    }
    let ranges = fence_byte_ranges(text);
    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < text.len() {
        let window_end = char_boundary_after(text, start, limit);
        if window_end >= text.len() {
            chunks.push(text[start..].to_string());
            break;
        }
        let split_at = best_split_point(text, start, window_end, &ranges);
        let split_at = if split_at <= start { window_end } else { split_at };
        chunks.push(text[start..split_at].trim_end_matches('\n').to_string());
        start = skip_leading_newlines(text, split_at);
    }
    chunks.into_iter().filter(|c| !c.is_empty()).collect()
}

/// Render one chunk starting at `start`, shrinking the candidate window
/// until its *rendered* HTML fits `limit` characters. Escaping (`&` →
/// `&amp;`) and emphasis/fence wrapping only ever grow a string, so a
/// window sized against raw text alone can render past the transport cap;
/// rendering-then-measuring (and retrying smaller on overflow) is what
/// actually guarantees the cap instead of just estimating it. Returns the
/// rendered HTML and the raw-text offset consumed.
fn render_chunk_within_limit(
    text: &str,
    start: usize,
    ranges: &[(usize, usize)],
    limit: usize,
) -> (String, usize) {
    let remaining_chars = text[start..].chars().count();
    let mut window_chars = limit.min(remaining_chars).max(1);
    loop {
        let window_end = char_boundary_after(text, start, window_chars);
        let split_at = if window_end >= text.len() {
            text.len()
        } else {
            let candidate = best_split_point(text, start, window_end, ranges);
            if candidate <= start {
                window_end
            } else {
                candidate
            }
        };
        let raw_chunk = text[start..split_at].trim_end_matches('\n');
        let rendered = markdown_to_html(raw_chunk);
        if rendered.chars().count() <= limit || window_chars <= 1 {
            return (rendered, split_at);
        }
        // Shrink proportionally to how far over budget the render came in,
        // always making forward progress so the loop terminates.
        let overflow_ratio = limit as f64 / rendered.chars().count() as f64;
        let shrunk = (window_chars as f64 * overflow_ratio).floor() as usize;
        window_chars = shrunk.min(window_chars.saturating_sub(1)).max(1);
    }
}

/// Split `text` into HTML chunks that each fit the transport limit,
/// rendering markdown to HTML *before* measuring (spec §4.H orders format,
/// step 4, before split, step 6 — the 4096 cap governs the rendered
/// message, not the raw markdown). `first_chunk_reserved` is the number of
/// characters the caller will prefix onto the first chunk (e.g. the
/// `<b>worker:</b>\n` frame) and is subtracted from its budget only.
pub fn split_and_render_for_transport(
    text: &str,
    limit: usize,
    first_chunk_reserved: usize,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let ranges = fence_byte_ranges(text);
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut first = true;
    while start < text.len() {
        let reserved = if first { first_chunk_reserved } else { 0 };
        let budget = limit.saturating_sub(reserved).max(1);
        let (rendered, split_at) = render_chunk_within_limit(text, start, &ranges, budget);
        if !rendered.is_empty() {
            chunks.push(rendered);
        }
        start = skip_leading_newlines(text, split_at);
        first = false;
    }
    chunks
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
