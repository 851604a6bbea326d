// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn last_chat_id_round_trips() {
    let dir = tempdir().unwrap();
    let node = NodeFs::new(dir.path());
    node.ensure_root().await.unwrap();

    assert_eq!(node.load_last_chat_id().await, None);

    node.save_last_chat_id("42").await.unwrap();
    assert_eq!(node.load_last_chat_id().await, Some("42".to_string()));
}

#[tokio::test]
async fn last_active_round_trips() {
    let dir = tempdir().unwrap();
    let node = NodeFs::new(dir.path());
    node.ensure_root().await.unwrap();

    node.save_last_active("alice").await.unwrap();
    assert_eq!(node.load_last_active().await, Some("alice".to_string()));
}
