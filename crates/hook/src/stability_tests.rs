// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::cell::Cell;

fn identity(s: &str) -> String {
    s.to_string()
}

#[test]
fn returns_immediately_once_two_reads_match() {
    let calls = Cell::new(0);
    let sleeps = Cell::new(0);
    let reads = ["partial", "partial", "done", "done"];

    let result = poll_with(
        || {
            let i = calls.get();
            calls.set(i + 1);
            reads.get(i).map(|s| (s.len() as u64, s.to_string()))
        },
        identity,
        |_| sleeps.set(sleeps.get() + 1),
    );

    assert_eq!(result, "partial");
    assert_eq!(calls.get(), 2);
    assert_eq!(sleeps.get(), 1);
}

#[test]
fn size_change_resets_stability() {
    let calls = Cell::new(0);
    let reads = ["a", "ab", "ab"];

    let result = poll_with(
        || {
            let i = calls.get();
            calls.set(i + 1);
            reads.get(i).map(|s| (s.len() as u64, s.to_string()))
        },
        identity,
        |_| {},
    );

    assert_eq!(result, "ab");
    assert_eq!(calls.get(), 3);
}

#[test]
fn exhausting_budget_returns_last_extraction() {
    let calls = Cell::new(0);

    let result = poll_with(
        || {
            let i = calls.get();
            calls.set(i + 1);
            Some((i as u64, format!("v{i}")))
        },
        identity,
        |_| {},
    );

    assert_eq!(result, "v39");
    assert_eq!(calls.get(), 40);
}

#[test]
fn unreadable_file_yields_empty_string() {
    let result = poll_with(|| None, identity, |_| {});
    assert_eq!(result, "");
}
