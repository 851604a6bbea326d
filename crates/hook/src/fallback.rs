// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pane-capture fallback (spec §4.C.6, default on): used only when
//! transcript extraction produced nothing — for example a pane still
//! mid-render when the stop event fired.

const BULLET: char = '●';
const PROMPT_GLYPHS: &[char] = &['❯', '>'];
const INCOMPLETE_NOTICE: &str = "\n\n(captured from terminal output, may be incomplete)";

/// Spinner glyphs the agent draws while "thinking" — a line starting with
/// one of these is animation, not part of the reply.
const STATUS_MARKERS: &[char] = &[
    '✢', '✶', '✻', '·', '⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏',
];

/// Find the last "●"-prefixed block in `pane` and return its text (status
/// lines dropped, a trailing prompt or separator line ending the capture),
/// with a one-line incompleteness warning appended. `None` if no bullet
/// line is present at all.
pub fn extract_from_pane(pane: &str) -> Option<String> {
    let lines: Vec<&str> = pane.lines().collect();
    let start = lines
        .iter()
        .rposition(|l| l.trim_start().starts_with(BULLET))?;

    let mut collected = Vec::new();
    for (offset, line) in lines[start..].iter().enumerate() {
        let trimmed = line.trim_start();
        if is_prompt_line(trimmed) || is_separator_line(trimmed) {
            break;
        }
        if is_status_marker_line(trimmed) {
            continue;
        }
        if offset == 0 {
            collected.push(trimmed.trim_start_matches(BULLET).trim_start());
        } else {
            collected.push(*line);
        }
    }

    let body = collected.join("\n").trim().to_string();
    if body.is_empty() {
        return None;
    }
    Some(format!("{body}{INCOMPLETE_NOTICE}"))
}

fn is_prompt_line(line: &str) -> bool {
    line.chars()
        .next()
        .is_some_and(|c| PROMPT_GLYPHS.contains(&c))
}

fn is_separator_line(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| matches!(c, '─' | '-' | '='))
}

fn is_status_marker_line(line: &str) -> bool {
    line.chars()
        .next()
        .is_some_and(|c| STATUS_MARKERS.contains(&c))
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
