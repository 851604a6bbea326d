// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use wrangler_adapters::FakeChatTransport;

#[tokio::test]
async fn same_worker_locks_serialize() {
    let locks = LockMap::new();
    let order = Arc::new(SyncMutex::new(Vec::new()));

    let l1 = locks.clone();
    let o1 = order.clone();
    let t1 = tokio::spawn(async move {
        let _g = l1.lock("alice").await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        o1.lock().push(1);
    });

    tokio::time::sleep(Duration::from_millis(5)).await;
    let l2 = locks.clone();
    let o2 = order.clone();
    let t2 = tokio::spawn(async move {
        let _g = l2.lock("alice").await;
        o2.lock().push(2);
    });

    t1.await.unwrap();
    t2.await.unwrap();
    assert_eq!(*order.lock(), vec![1, 2], "second send must wait for the first to release");
}

#[tokio::test]
async fn different_workers_do_not_block_each_other() {
    let locks = LockMap::new();
    let _a = locks.lock("alice").await;
    // Should not deadlock or block: different key.
    let _b = tokio::time::timeout(Duration::from_millis(200), locks.lock("bob"))
        .await
        .expect("locking a different worker must not wait on alice's lock");
    drop(_b);
}

#[tokio::test]
async fn starting_typing_twice_does_not_spawn_a_second_task() {
    let chat = FakeChatTransport::new();
    let loops = TypingLoops::new(chat.clone());
    loops.start("alice", ChatId::new("1"));
    loops.start("alice", ChatId::new("1"));
    assert_eq!(loops.handles.lock().len(), 1);
    loops.stop("alice");
}

#[tokio::test]
async fn stop_cancels_the_loop() {
    let calls = Arc::new(AtomicUsize::new(0));
    let chat = FakeChatTransport::new();
    let loops = TypingLoops::new(chat.clone());
    loops.start("alice", ChatId::new("1"));
    tokio::time::sleep(Duration::from_millis(10)).await;
    loops.stop("alice");
    assert!(loops.handles.lock().get("alice").is_none());
    let _ = calls;
}
