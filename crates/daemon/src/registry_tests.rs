// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wrangler_adapters::FakeMultiplexer;

fn registry() -> (Registry<FakeMultiplexer>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let node_fs = NodeFs::new(dir.path());
    (
        Registry::new(FakeMultiplexer::new(), "wrangler-".to_string(), node_fs),
        dir,
    )
}

#[tokio::test]
async fn list_is_empty_when_no_sessions_exist() {
    let (reg, _dir) = registry();
    assert!(reg.list().await.is_empty());
}

#[tokio::test]
async fn worker_exists_iff_mux_session_exists() {
    let (reg, _dir) = registry();
    assert!(!reg.exists("alice").await);
    reg.mux().seed_session("alice");
    assert!(reg.exists("alice").await);
}

#[tokio::test]
async fn status_is_running_when_foreground_is_not_a_shell() {
    let (reg, _dir) = registry();
    reg.mux().seed_session("alice");
    reg.mux().set_foreground_cmd("alice", "claude");

    let workers = reg.list().await;
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].status, WorkerStatus::Running);
    assert_eq!(workers[0].session_name, "wrangler-alice");
}

#[tokio::test]
async fn status_is_idle_when_foreground_is_a_shell() {
    let (reg, _dir) = registry();
    reg.mux().seed_session("alice");
    reg.mux().set_foreground_cmd("alice", "zsh");

    assert_eq!(reg.list().await[0].status, WorkerStatus::Idle);
}

#[tokio::test]
async fn paused_marker_overrides_foreground_status() {
    let (reg, _dir) = registry();
    reg.mux().seed_session("alice");
    reg.mux().set_foreground_cmd("alice", "claude");
    reg.mark_paused("alice");

    assert_eq!(reg.list().await[0].status, WorkerStatus::Paused);
    reg.clear_paused("alice");
    assert_eq!(reg.list().await[0].status, WorkerStatus::Running);
}

#[tokio::test]
async fn set_focus_persists_and_clear_focus_persists_empty() {
    let (reg, dir) = registry();
    reg.set_focus(Some(WorkerId::new("alice"))).await;
    assert_eq!(reg.focused(), Some(WorkerId::new("alice")));
    assert_eq!(
        tokio::fs::read_to_string(dir.path().join("last_active")).await.unwrap().trim(),
        "alice"
    );

    reg.set_focus(None).await;
    assert_eq!(reg.focused(), None);
}

#[tokio::test]
async fn load_persisted_focus_is_rejected_if_session_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let node_fs = NodeFs::new(dir.path());
    node_fs.save_last_active("ghost").await.unwrap();

    let reg = Registry::new(FakeMultiplexer::new(), "wrangler-".to_string(), node_fs);
    reg.load_persisted_focus().await;
    assert_eq!(reg.focused(), None, "stale focus pointer must not resurrect a dead worker");
}

#[tokio::test]
async fn load_persisted_focus_restores_a_live_session() {
    let dir = tempfile::tempdir().unwrap();
    let node_fs = NodeFs::new(dir.path());
    node_fs.save_last_active("alice").await.unwrap();

    let mux = FakeMultiplexer::new();
    mux.seed_session("alice");
    let reg = Registry::new(mux, "wrangler-".to_string(), node_fs);
    reg.load_persisted_focus().await;
    assert_eq!(reg.focused(), Some(WorkerId::new("alice")));
}
