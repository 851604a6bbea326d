// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn extracts_bullet_block_up_to_prompt() {
    let pane = "\
some earlier noise
● Here is the result.
It has a second line.
❯ ";
    let extracted = extract_from_pane(pane).unwrap();
    assert!(extracted.starts_with("Here is the result.\nIt has a second line."));
    assert!(extracted.ends_with("may be incomplete)"));
}

#[test]
fn skips_animated_status_lines() {
    let pane = "\
● Working on it
✢ Thinking…
done with the task
❯ ";
    let extracted = extract_from_pane(pane).unwrap();
    assert!(!extracted.contains("Thinking"));
    assert!(extracted.contains("done with the task"));
}

#[test]
fn stops_at_separator_line() {
    let pane = "\
● Partial answer
──────────────
leftover prompt chrome";
    let extracted = extract_from_pane(pane).unwrap();
    assert_eq!(extracted, "Partial answer\n\n(captured from terminal output, may be incomplete)");
}

#[test]
fn no_bullet_line_yields_none() {
    let pane = "just a plain shell\n$ ";
    assert_eq!(extract_from_pane(pane), None);
}

#[test]
fn uses_the_last_bullet_block_not_the_first() {
    let pane = "\
● stale earlier reply
──────────────
❯ /hire bob
● fresh reply here
❯ ";
    let extracted = extract_from_pane(pane).unwrap();
    assert!(extracted.starts_with("fresh reply here"));
}
