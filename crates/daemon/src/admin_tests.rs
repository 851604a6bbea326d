// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn gate() -> (AdminGate, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let node_fs = NodeFs::new(dir.path());
    (AdminGate::new(None, node_fs), dir)
}

#[tokio::test]
async fn first_sender_becomes_admin_and_is_persisted() {
    let (gate, dir) = gate();
    let sender = ChatId::new("42");

    assert!(gate.admit(&sender).await);
    assert_eq!(gate.current(), Some(sender.clone()));

    let persisted = tokio::fs::read_to_string(dir.path().join("last_chat_id"))
        .await
        .unwrap();
    assert_eq!(persisted.trim(), "42");
}

#[tokio::test]
async fn other_chats_are_dropped_after_admin_is_set() {
    let (gate, _dir) = gate();
    assert!(gate.admit(&ChatId::new("42")).await);
    assert!(!gate.admit(&ChatId::new("99")).await);
    assert_eq!(gate.current(), Some(ChatId::new("42")));
}

#[tokio::test]
async fn preset_admin_is_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let node_fs = NodeFs::new(dir.path());
    let gate = AdminGate::new(Some(ChatId::new("1")), node_fs);

    assert!(!gate.admit(&ChatId::new("2")).await);
    assert_eq!(gate.current(), Some(ChatId::new("1")));
}

#[tokio::test]
async fn load_persisted_fills_in_a_missing_admin() {
    let dir = tempfile::tempdir().unwrap();
    let node_fs = NodeFs::new(dir.path());
    node_fs.save_last_chat_id("7").await.unwrap();

    let gate = AdminGate::new(None, node_fs);
    assert!(gate.current().is_none());
    gate.load_persisted().await;
    assert_eq!(gate.current(), Some(ChatId::new("7")));
}

#[tokio::test]
async fn load_persisted_does_not_override_a_preset() {
    let dir = tempfile::tempdir().unwrap();
    let node_fs = NodeFs::new(dir.path());
    node_fs.save_last_chat_id("7").await.unwrap();

    let gate = AdminGate::new(Some(ChatId::new("1")), node_fs);
    gate.load_persisted().await;
    assert_eq!(gate.current(), Some(ChatId::new("1")));
}
