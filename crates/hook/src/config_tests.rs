// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_nothing_set() {
    let cfg = HookConfig::from_env(env_of(&[]));
    assert_eq!(cfg.bridge_url, "http://127.0.0.1:8088");
    assert_eq!(cfg.tmux_prefix, "wrangler-");
    assert_eq!(cfg.sessions_dir, "/tmp/wrangler/sessions");
}

#[test]
fn sessions_dir_read_from_session_env() {
    let cfg = HookConfig::from_env(env_of(&[("SESSIONS_DIR", "/state/wrangler/sessions")]));
    assert_eq!(cfg.sessions_dir, "/state/wrangler/sessions");
}

#[test]
fn session_env_wins_over_process_env() {
    let cfg = HookConfig::from_env(env_of(&[
        ("PORT", "9100"),
        ("WRANGLER_PORT", "7000"),
        ("BRIDGE_URL", "http://session-scoped:9100"),
        ("WRANGLER_BRIDGE_URL", "http://process-scoped:7000"),
    ]));
    assert_eq!(cfg.bridge_url, "http://session-scoped:9100");
}

#[test]
fn process_env_used_when_session_env_absent() {
    let cfg = HookConfig::from_env(env_of(&[("WRANGLER_BRIDGE_URL", "http://process-scoped:7000")]));
    assert_eq!(cfg.bridge_url, "http://process-scoped:7000");
}

#[test]
fn port_alone_derives_default_bridge_url() {
    let cfg = HookConfig::from_env(env_of(&[("PORT", "9999")]));
    assert_eq!(cfg.bridge_url, "http://127.0.0.1:9999");
}
