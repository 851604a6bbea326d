// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

#[tokio::test]
async fn create_then_exists_and_list() {
    let mux = FakeMultiplexer::new();
    mux.create("alice", Path::new("/tmp"), "claude").await.unwrap();

    assert!(mux.exists("alice").await.unwrap());
    assert_eq!(mux.list().await.unwrap(), vec!["alice".to_string()]);
}

#[tokio::test]
async fn create_twice_is_already_exists() {
    let mux = FakeMultiplexer::new();
    mux.create("alice", Path::new("/tmp"), "claude").await.unwrap();

    let err = mux.create("alice", Path::new("/tmp"), "claude").await.unwrap_err();
    assert!(matches!(err, MuxError::AlreadyExists(_)));
}

#[tokio::test]
async fn kill_removes_from_list() {
    let mux = FakeMultiplexer::new();
    mux.create("alice", Path::new("/tmp"), "claude").await.unwrap();

    mux.kill("alice").await.unwrap();

    assert!(!mux.exists("alice").await.unwrap());
    assert!(mux.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn send_to_missing_session_is_not_found() {
    let mux = FakeMultiplexer::new();
    let err = mux.send_literal("ghost", "hi").await.unwrap_err();
    assert!(matches!(err, MuxError::NotFound(_)));
}

#[tokio::test]
async fn calls_records_send_sequence() {
    let mux = FakeMultiplexer::new();
    mux.create("alice", Path::new("/tmp"), "claude").await.unwrap();
    mux.send_literal("alice", "hello").await.unwrap();
    mux.send_enter("alice").await.unwrap();

    let calls = mux.calls();
    assert!(matches!(calls[1], MuxCall::SendLiteral { .. }));
    assert!(matches!(calls[2], MuxCall::SendEnter { .. }));
}

#[tokio::test]
async fn foreground_cmd_reflects_seeded_state() {
    let mux = FakeMultiplexer::new();
    mux.create("alice", Path::new("/tmp"), "claude").await.unwrap();
    mux.set_foreground_cmd("alice", "vim");

    assert_eq!(mux.foreground_cmd("alice").await.unwrap(), "vim");
}
