// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wrangler_adapters::FakeMultiplexer;
use wrangler_core::{FakeClock, WorkerId};

fn setup() -> (Registry<FakeMultiplexer>, CoordFs, FakeClock, Config, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let node_fs = wrangler_adapters::NodeFs::new(dir.path());
    let registry = Registry::new(FakeMultiplexer::new(), "wrangler-".to_string(), node_fs);
    let coordfs = CoordFs::new(dir.path().join("sessions"));
    let clock = FakeClock::new(1_000_000);
    let config = Config {
        sessions_root: dir.path().join("sessions"),
        node_root: dir.path().to_path_buf(),
        port: 8088,
        tmux_prefix: "wrangler-".to_string(),
        admin_chat_id: None,
        webhook_secret: None,
        bot_token: None,
        sandbox_cmd: None,
        agent_cmd: "claude".to_string(),
        bridge_url: None,
    };
    (registry, coordfs, clock, config, dir)
}

#[tokio::test]
async fn workers_and_focused_reflect_registry() {
    let (registry, coordfs, clock, config, _dir) = setup();
    registry.mux().seed_session("alice");
    registry.set_focus(Some(WorkerId::new("alice"))).await;

    let ctx = DaemonRoutingContext {
        registry: &registry,
        coordfs: &coordfs,
        clock: &clock,
        config: &config,
    };
    let workers = ctx.workers().await;
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].name, "alice");
    assert_eq!(ctx.focused().await.as_deref(), Some("alice"));
    assert!(ctx.exists("alice").await);
    assert!(!ctx.exists("bob").await);
}

#[tokio::test]
async fn pending_age_is_none_until_stamped_and_some_after() {
    let (registry, coordfs, clock, config, _dir) = setup();
    coordfs.ensure_worker_dir("alice").await.unwrap();
    let ctx = DaemonRoutingContext {
        registry: &registry,
        coordfs: &coordfs,
        clock: &clock,
        config: &config,
    };
    assert_eq!(ctx.pending_age_secs("alice").await, None);

    coordfs.set_pending("alice", clock.now_unix()).await.unwrap();
    clock.advance(30);
    assert_eq!(ctx.pending_age_secs("alice").await, Some(30));
}

#[tokio::test]
async fn chat_id_lookup_reads_the_coordfs_file() {
    let (_registry, coordfs, _clock, _config, _dir) = setup();
    coordfs.ensure_worker_dir("alice").await.unwrap();
    coordfs.set_chat_id("alice", "555").await.unwrap();

    let lookup = DaemonChatIdLookup { coordfs: &coordfs };
    assert_eq!(lookup.chat_id_for("alice").await, Some(ChatId::new("555")));
    assert_eq!(lookup.chat_id_for("bob").await, None);
}
