// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Port, bridge URL, and session-prefix resolution: the per-session env
//! vars the daemon stamps onto a worker's tmux session at creation time
//! (`PORT`, `BRIDGE_URL`, `TMUX_PREFIX` — see `wrangler-adapters`' tmux
//! adapter) take precedence over the hook's own process environment
//! (spec §4.C.3), which in turn falls back to the daemon's own defaults.

#[derive(Debug, Clone, PartialEq)]
pub struct HookConfig {
    pub bridge_url: String,
    pub tmux_prefix: String,
    pub sessions_dir: String,
}

impl HookConfig {
    pub fn load() -> Self {
        Self::from_env(|key| std::env::var(key).ok())
    }

    fn from_env(get: impl Fn(&str) -> Option<String>) -> Self {
        let port: u16 = get("PORT")
            .or_else(|| get("WRANGLER_PORT"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(8088);
        let bridge_url = get("BRIDGE_URL")
            .or_else(|| get("WRANGLER_BRIDGE_URL"))
            .unwrap_or_else(|| format!("http://127.0.0.1:{port}"));
        let tmux_prefix = get("TMUX_PREFIX")
            .or_else(|| get("WRANGLER_TMUX_PREFIX"))
            .unwrap_or_else(|| "wrangler-".to_string());
        let sessions_dir = get("SESSIONS_DIR")
            .or_else(|| get("WRANGLER_SESSIONS_DIR"))
            .unwrap_or_else(|| "/tmp/wrangler/sessions".to_string());
        Self {
            bridge_url,
            tmux_prefix,
            sessions_dir,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
