// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Determine the worker's short name from the multiplexer session this
//! hook is invoked inside (spec §4.C.1).

use std::process::Command;

/// The full tmux session name of the pane this process is running in, or
/// `None` if not attached to a tmux session at all (e.g. run by hand).
pub fn current_session_name() -> Option<String> {
    let output = Command::new("tmux")
        .args(["display-message", "-p", "#S"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Strip the bridge's tmux-session prefix from a full session name,
/// yielding the worker's short name. `None` if the session isn't one of
/// ours — the hook exits silently rather than guess (spec: "if not
/// prefixed, exit silently").
pub fn worker_name(full_session: &str, prefix: &str) -> Option<String> {
    full_session
        .strip_prefix(prefix)
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

/// The fallback pane capture (spec §4.C.6): last `lines` lines of the
/// session's pane, used only when transcript extraction comes up empty.
pub fn capture_last_lines(full_session: &str, lines: u32) -> Option<String> {
    let output = Command::new("tmux")
        .args([
            "capture-pane",
            "-t",
            full_session,
            "-p",
            "-S",
            &format!("-{lines}"),
        ])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
