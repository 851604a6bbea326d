// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;
use wrangler_core::FakeClock;

#[tokio::test]
async fn ensure_worker_dir_creates_dir_and_inbox_0700() {
    let dir = tempdir().unwrap();
    let coord = CoordFs::new(dir.path());

    coord.ensure_worker_dir("alice").await.unwrap();

    let worker_dir = dir.path().join("alice");
    assert!(worker_dir.is_dir());
    assert!(worker_dir.join("inbox").is_dir());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&worker_dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
    }
}

#[tokio::test]
async fn chat_id_absent_until_set() {
    let dir = tempdir().unwrap();
    let coord = CoordFs::new(dir.path());
    coord.ensure_worker_dir("alice").await.unwrap();

    assert_eq!(coord.get_chat_id("alice").await, None);

    coord.set_chat_id("alice", "42").await.unwrap();
    assert_eq!(coord.get_chat_id("alice").await, Some("42".to_string()));
}

#[tokio::test]
async fn pending_is_live_under_ttl_and_stale_past_it() {
    let dir = tempdir().unwrap();
    let coord = CoordFs::new(dir.path());
    coord.ensure_worker_dir("carol").await.unwrap();

    let clock = FakeClock::new(1_000);
    coord.set_pending("carol", clock.now_unix()).await.unwrap();
    assert!(coord.is_pending("carol", &clock).await);

    clock.advance(700);
    assert!(!coord.is_pending("carol", &clock).await);
}

#[tokio::test]
async fn clear_pending_is_idempotent() {
    let dir = tempdir().unwrap();
    let coord = CoordFs::new(dir.path());
    coord.ensure_worker_dir("dave").await.unwrap();

    coord.clear_pending("dave").await.unwrap();
    coord.clear_pending("dave").await.unwrap();

    let clock = wrangler_core::SystemClock;
    assert!(!coord.is_pending("dave", &clock).await);
}

#[tokio::test]
async fn remove_worker_dir_deletes_inbox_and_pending() {
    let dir = tempdir().unwrap();
    let coord = CoordFs::new(dir.path());
    coord.ensure_worker_dir("erin").await.unwrap();
    coord.set_chat_id("erin", "1").await.unwrap();

    coord.remove_worker_dir("erin").await.unwrap();

    assert!(!dir.path().join("erin").exists());
    // Idempotent: ending an already-gone worker doesn't error.
    coord.remove_worker_dir("erin").await.unwrap();
}

#[tokio::test]
async fn hire_end_hire_leaves_no_stale_state() {
    let dir = tempdir().unwrap();
    let coord = CoordFs::new(dir.path());

    coord.ensure_worker_dir("frank").await.unwrap();
    coord.set_chat_id("frank", "7").await.unwrap();
    coord.set_pending("frank", 1).await.unwrap();
    coord.remove_worker_dir("frank").await.unwrap();

    coord.ensure_worker_dir("frank").await.unwrap();
    assert_eq!(coord.get_chat_id("frank").await, None);
    let clock = wrangler_core::SystemClock;
    assert!(!coord.is_pending("frank", &clock).await);
}
