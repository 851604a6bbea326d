// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::env;

fn clear_env() {
    for key in [
        "WRANGLER_STATE_DIR",
        "WRANGLER_PORT",
        "WRANGLER_TMUX_PREFIX",
        "WRANGLER_ADMIN_CHAT_ID",
        "WRANGLER_WEBHOOK_SECRET",
        "WRANGLER_BOT_TOKEN",
        "WRANGLER_SANDBOX_CMD",
        "WRANGLER_AGENT_CMD",
        "WRANGLER_BRIDGE_URL",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn defaults_apply_when_nothing_is_set() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    env::set_var("WRANGLER_STATE_DIR", dir.path());

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.port, 8088);
    assert_eq!(cfg.tmux_prefix, "wrangler-");
    assert!(cfg.admin_chat_id.is_none());
    assert_eq!(cfg.launch_cmd(), "claude");
    clear_env();
}

#[test]
#[serial]
fn env_vars_override_file_and_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("wrangler.toml"),
        "port = 9000\ntmux_prefix = \"fromfile-\"\n",
    )
    .unwrap();
    env::set_var("WRANGLER_STATE_DIR", dir.path());
    env::set_var("WRANGLER_PORT", "9100");

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.port, 9100, "env var wins over file");
    assert_eq!(cfg.tmux_prefix, "fromfile-", "file wins over built-in default");
    clear_env();
}

#[test]
#[serial]
fn sandbox_cmd_takes_precedence_in_launch_cmd() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    env::set_var("WRANGLER_STATE_DIR", dir.path());
    env::set_var("WRANGLER_SANDBOX_CMD", "run-sandboxed claude");

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.launch_cmd(), "run-sandboxed claude");
    clear_env();
}

#[test]
#[serial]
fn malformed_toml_is_an_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("wrangler.toml"), "not valid [[[ toml").unwrap();
    env::set_var("WRANGLER_STATE_DIR", dir.path());

    assert!(Config::load().is_err());
    clear_env();
}
