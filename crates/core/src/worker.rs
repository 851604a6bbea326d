// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identity, reserved-name policy, and foreground status.

crate::define_id! {
    /// A worker's short identifier, e.g. `"alice"`.
    ///
    /// Matches `[a-z0-9-]+` and is never a reserved name (see
    /// [`is_reserved`]). This is the name the manager types in chat, not the
    /// full multiplexer session name (which additionally carries the
    /// namespace prefix — see `wrangler_adapters::mux::session_name`).
    pub struct WorkerId;
}

/// Names a worker may never take: built-in commands, their aliases, and the
/// broadcast/focus-hint keywords used by the routing engine.
pub const RESERVED_NAMES: &[&str] = &[
    "hire", "end", "team", "focus", "progress", "pause", "relaunch", "settings", "learn", "all",
    "start", "help",
];

/// Errors validating a candidate worker name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("worker name must be lowercase letters, digits, and hyphens only")]
    Invalid,
    #[error("'{0}' is a reserved name")]
    Reserved(String),
    #[error("worker name cannot be empty")]
    Empty,
}

/// Validate and normalize a candidate worker name.
///
/// Lowercases the input, then requires it to match `[a-z0-9-]+` and not be
/// in [`RESERVED_NAMES`]. This is the single gate `hire` and the reserved
/// slash-command check in the routing engine both go through.
pub fn validate_name(candidate: &str) -> Result<String, NameError> {
    let lowered = candidate.to_lowercase();
    if lowered.is_empty() {
        return Err(NameError::Empty);
    }
    if !lowered
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(NameError::Invalid);
    }
    if is_reserved(&lowered) {
        return Err(NameError::Reserved(lowered));
    }
    Ok(lowered)
}

/// Whether `name` is in the reserved set (case-insensitive).
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name.to_lowercase().as_str())
}

/// Foreground status of a worker, derived from the multiplexer at read time.
///
/// Never persisted: the worker set and its status are always a live view
/// over the multiplexer (see invariant in spec §3 — "the registry is a
/// derived view, never authoritative").
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Idle,
    Running,
    Paused,
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkerStatus::Idle => "idle",
            WorkerStatus::Running => "running",
            WorkerStatus::Paused => "paused",
        };
        write!(f, "{s}")
    }
}

/// A worker as seen by the registry: identity plus derived status and the
/// volatile metadata the bridge tracks alongside the multiplexer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub id: WorkerId,
    pub session_name: String,
    pub status: WorkerStatus,
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
